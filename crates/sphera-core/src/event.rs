//! Engine events, buffered in a fixed-capacity ring.
//!
//! Events are recorded as the engine mutates state and drained by the UI
//! once per frame for collection effects, counters, and overlays. When
//! the buffer is full the oldest events are dropped; the UI layer reads
//! authoritative state from the engine anyway, so a dropped event only
//! costs a transient effect.

use crate::element::Element;
use crate::id::AnchorId;
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Something the engine did that the UI may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// An anchor was placed (by the detection pipeline or the host).
    AnchorPlaced { id: AnchorId, element: Element },
    /// A tap collected an anchor.
    AnchorCollected {
        id: AnchorId,
        element: Element,
        distance_px: f32,
    },
    /// A tap resolved against no eligible anchor. Expected in normal play.
    TapMissed { x: f32, y: f32 },
    /// The needed element changed (collection count was reset).
    NeededElementChanged { needed: Option<Element> },
    /// All anchors were removed at once.
    AnchorsCleared { removed: usize },
}

// ---------------------------------------------------------------------------
// Ring buffer
// ---------------------------------------------------------------------------

/// Fixed-capacity event ring. Oldest events are dropped when full.
#[derive(Debug)]
pub struct EventBuffer {
    events: VecDeque<EngineEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventBuffer {
    /// Create a buffer holding up to `capacity` events. A capacity of 0
    /// is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Record an event, dropping the oldest one if the buffer is full.
    pub fn push(&mut self, event: EngineEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Remove and return all buffered events, oldest first.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events lost to overflow since creation.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}

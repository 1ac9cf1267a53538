//! The collection engine: owns all session state and orchestrates the
//! per-frame tap resolution pipeline.
//!
//! # Architecture
//!
//! The `CollectionEngine` owns:
//! - An [`AnchorStore`] (live collectible spheres)
//! - A [`CollectionState`] (needed-element filter + counter)
//! - The single-slot tap queue shared with [`TapHandle`]s
//! - The anchor command queue shared with [`DetectionHandle`]s
//! - An [`EventBuffer`] drained by the UI each frame
//!
//! The engine is an explicit context object owned by the host AR session
//! controller; there is no ambient global state, so sessions (and tests)
//! never leak into each other.
//!
//! # Threading
//!
//! The frame thread holds `&mut CollectionEngine`. Input and detection
//! threads interact only through the cloneable handles, which stop
//! working the moment [`CollectionEngine::detach`] runs (the host view
//! was torn down); late callbacks are detected there and dropped rather
//! than assumed impossible.

use crate::anchor::{Anchor, AnchorStore};
use crate::collection::CollectionState;
use crate::command::{AnchorCommand, CommandQueue, DetectionHandle};
use crate::config::{ConfigError, EngineConfig};
use crate::element::Element;
use crate::event::{EngineEvent, EventBuffer};
use crate::id::AnchorId;
use crate::projection::{CameraPose, ScreenPoint};
use crate::tap::{TapHandle, TapSlot};
use nalgebra::Point3;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A successful collection returned by
/// [`CollectionEngine::resolve_pending_tap`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collected {
    /// The id the anchor had while live. Stale after this point.
    pub id: AnchorId,
    /// The collected anchor (already removed from the store).
    pub anchor: Anchor,
    /// Pixel distance between the tap and the anchor's projection.
    pub distance_px: f32,
}

/// An eligible anchor projected for the UI overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleAnchor {
    pub id: AnchorId,
    pub element: Element,
    pub screen: ScreenPoint,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The AR anchor and collection engine for one session.
#[derive(Debug)]
pub struct CollectionEngine {
    config: EngineConfig,
    store: AnchorStore,
    collection: CollectionState,
    events: EventBuffer,
    taps: Arc<TapSlot>,
    commands: Arc<CommandQueue>,
    live: Arc<AtomicBool>,
}

impl CollectionEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let events = EventBuffer::new(config.event_capacity);
        Ok(Self {
            config,
            store: AnchorStore::new(),
            collection: CollectionState::new(),
            events,
            taps: Arc::new(TapSlot::new()),
            commands: Arc::new(CommandQueue::new()),
            live: Arc::new(AtomicBool::new(true)),
        })
    }

    // -----------------------------------------------------------------------
    // Handles
    // -----------------------------------------------------------------------

    /// Handle for the input thread to submit taps.
    pub fn tap_handle(&self) -> TapHandle {
        TapHandle {
            slot: Arc::clone(&self.taps),
            live: Arc::clone(&self.live),
        }
    }

    /// Handle for the detection pipeline to place anchors.
    pub fn detection_handle(&self) -> DetectionHandle {
        DetectionHandle {
            queue: Arc::clone(&self.commands),
            live: Arc::clone(&self.live),
        }
    }

    // -----------------------------------------------------------------------
    // State access
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &AnchorStore {
        &self.store
    }

    /// The element currently gating collection, if any.
    pub fn needed_element(&self) -> Option<Element> {
        self.collection.needed()
    }

    /// Collections made since the needed element was last set.
    pub fn collected_count(&self) -> u32 {
        self.collection.collected()
    }

    pub(crate) fn collection_state(&self) -> &CollectionState {
        &self.collection
    }

    // -----------------------------------------------------------------------
    // Session mutations
    // -----------------------------------------------------------------------

    /// Set (or clear) the needed element. Always resets the collection
    /// count to zero.
    pub fn set_needed_element(&mut self, needed: Option<Element>) {
        self.collection.set_needed(needed);
        debug!(?needed, "needed element changed, count reset");
        self.events.push(EngineEvent::NeededElementChanged { needed });
    }

    /// Place an anchor directly from the frame thread (manual trigger).
    /// Detection-thread placements go through [`DetectionHandle`] instead.
    pub fn place_anchor(&mut self, element: Element, position: Point3<f32>) -> AnchorId {
        let id = self.store.insert(element, position);
        debug!(?id, %element, "anchor placed");
        self.events.push(EngineEvent::AnchorPlaced { id, element });
        id
    }

    /// Remove every live anchor.
    pub fn clear_anchors(&mut self) {
        let removed = self.store.len();
        self.store.clear();
        if removed > 0 {
            debug!(removed, "anchors cleared");
        }
        self.events.push(EngineEvent::AnchorsCleared { removed });
    }

    /// Restore externally captured state. Used by snapshot loading.
    pub(crate) fn restore_state(&mut self, store: AnchorStore, collection: CollectionState) {
        self.store = store;
        self.collection = collection;
    }

    // -----------------------------------------------------------------------
    // Frame pipeline
    // -----------------------------------------------------------------------

    /// Apply anchor commands queued by the detection pipeline since the
    /// last frame. Call once at the top of every frame. Does nothing once
    /// the engine is detached.
    pub fn begin_frame(&mut self) {
        if self.is_detached() {
            return;
        }
        for command in self.commands.drain() {
            match command {
                AnchorCommand::Place { element, position } => {
                    self.place_anchor(element, position);
                }
                AnchorCommand::Clear => self.clear_anchors(),
            }
        }
    }

    /// Consume the pending tap, if any, and resolve it against the
    /// current anchor set.
    ///
    /// Among eligible anchors that project within the configured pixel
    /// threshold, the nearest one wins; exact distance ties fall back to
    /// store enumeration order. A miss (empty store, filtered-out
    /// element, behind-camera anchor, out-of-threshold tap) changes
    /// nothing and is never an error. Once the engine is detached,
    /// nothing resolves: liveness is re-checked here, not just in the
    /// handles, so a tap that raced past the handle's check during
    /// teardown is still dropped.
    pub fn resolve_pending_tap(&mut self, pose: &CameraPose) -> Option<Collected> {
        if self.is_detached() {
            return None;
        }
        let tap = self.taps.take()?;
        let tap_point = ScreenPoint::new(tap.x, tap.y);

        let mut best: Option<(AnchorId, f32)> = None;
        for (id, anchor) in self.store.iter() {
            if !self.collection.eligible(anchor.element) {
                continue;
            }
            let Some(screen) = pose.project(anchor.position) else {
                continue;
            };
            let distance = screen.distance_to(tap_point);
            if distance > self.config.tap_threshold_px {
                continue;
            }
            // Strict `<` keeps the first-enumerated anchor on exact ties.
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((id, distance));
            }
        }

        let Some((id, distance_px)) = best else {
            trace!(x = tap.x, y = tap.y, "tap missed");
            self.events.push(EngineEvent::TapMissed { x: tap.x, y: tap.y });
            return None;
        };

        let anchor = self.store.remove(id)?;
        self.collection.record_collection();
        debug!(
            ?id,
            element = %anchor.element,
            distance_px,
            count = self.collection.collected(),
            "anchor collected"
        );
        self.events.push(EngineEvent::AnchorCollected {
            id,
            element: anchor.element,
            distance_px,
        });

        Some(Collected {
            id,
            anchor,
            distance_px,
        })
    }

    /// Project every eligible anchor for the UI overlay. Display only;
    /// plays no part in collection logic.
    pub fn visible_anchors(&self, pose: &CameraPose) -> Vec<VisibleAnchor> {
        self.store
            .iter()
            .filter(|(_, anchor)| self.collection.eligible(anchor.element))
            .filter_map(|(id, anchor)| {
                pose.project(anchor.position).map(|screen| VisibleAnchor {
                    id,
                    element: anchor.element,
                    screen,
                })
            })
            .collect()
    }

    /// Remove and return all buffered engine events, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Disconnect every external handle. Taps and anchor commands
    /// submitted after this point are dropped silently; pending ones are
    /// discarded.
    pub fn detach(&mut self) {
        self.live.store(false, Ordering::Release);
        let _ = self.taps.take();
        let _ = self.commands.drain();
    }

    pub fn is_detached(&self) -> bool {
        !self.live.load(Ordering::Acquire)
    }
}

impl Drop for CollectionEngine {
    fn drop(&mut self) {
        self.detach();
    }
}

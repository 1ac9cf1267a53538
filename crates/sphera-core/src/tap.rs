//! Single-slot tap queue between the input thread and the frame thread.
//!
//! The input thread only ever enqueues; the frame thread is the only
//! consumer. Only the most recently queued tap matters (a second tap
//! before the first is processed overwrites it), so a single atomic slot
//! is sufficient and the enqueue path never blocks.
//!
//! Both `f32` coordinates are packed into one `AtomicU64`, with the
//! all-ones bit pattern reserved as the empty sentinel. That pattern
//! decodes to NaN coordinates, which no real touch event carries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A screen-space tap in pixels. Consumed at most once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapEvent {
    pub x: f32,
    pub y: f32,
}

impl TapEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

const EMPTY: u64 = u64::MAX;

fn pack(tap: TapEvent) -> u64 {
    ((tap.x.to_bits() as u64) << 32) | tap.y.to_bits() as u64
}

fn unpack(bits: u64) -> TapEvent {
    TapEvent {
        x: f32::from_bits((bits >> 32) as u32),
        y: f32::from_bits(bits as u32),
    }
}

/// The shared slot. Held by the engine and by every [`TapHandle`] clone.
#[derive(Debug)]
pub(crate) struct TapSlot {
    slot: AtomicU64,
}

impl TapSlot {
    pub(crate) fn new() -> Self {
        Self {
            slot: AtomicU64::new(EMPTY),
        }
    }

    /// Overwrite the slot with a new tap. Never blocks.
    pub(crate) fn put(&self, tap: TapEvent) {
        self.slot.store(pack(tap), Ordering::Release);
    }

    /// Consume the pending tap, leaving the slot empty.
    pub(crate) fn take(&self) -> Option<TapEvent> {
        let bits = self.slot.swap(EMPTY, Ordering::AcqRel);
        (bits != EMPTY).then(|| unpack(bits))
    }
}

/// Cloneable handle the input thread uses to submit taps.
///
/// Safe to call concurrently with the frame thread's resolution. Once the
/// engine is detached (view torn down), taps are dropped silently.
#[derive(Debug, Clone)]
pub struct TapHandle {
    pub(crate) slot: Arc<TapSlot>,
    pub(crate) live: Arc<AtomicBool>,
}

impl TapHandle {
    /// Queue a tap at the given pixel coordinates, overwriting any tap
    /// that has not been resolved yet.
    pub fn tap(&self, x: f32, y: f32) {
        if !self.live.load(Ordering::Acquire) {
            tracing::trace!(x, y, "tap dropped: engine detached");
            return;
        }
        self.slot.put(TapEvent::new(x, y));
    }
}

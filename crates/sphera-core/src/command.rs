//! Anchor command queue for detection-thread mutations.
//!
//! The detection pipeline runs on its own thread and may place new
//! anchors at detected-object positions. Instead of locking the anchor
//! store against the frame thread's enumeration, placements are queued
//! here and drained at the start of the next frame
//! ([`crate::engine::CollectionEngine::begin_frame`]), keeping the frame
//! thread the sole mutator of the store.

use crate::element::Element;
use nalgebra::Point3;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A single anchor mutation submitted from outside the frame thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorCommand {
    /// Place a new collectible sphere at a world position.
    Place {
        element: Element,
        position: Point3<f32>,
    },
    /// Remove every live anchor.
    Clear,
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Commands waiting to be applied at the next frame boundary.
///
/// Anchor sets are small and submissions are infrequent, so a plain mutex
/// around a `Vec` is all the synchronization this needs.
#[derive(Debug, Default)]
pub(crate) struct CommandQueue {
    pending: Mutex<Vec<AnchorCommand>>,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AnchorCommand>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, command: AnchorCommand) {
        self.lock().push(command);
    }

    /// Drain all pending commands in submission order.
    pub(crate) fn drain(&self) -> Vec<AnchorCommand> {
        std::mem::take(&mut *self.lock())
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.lock().len()
    }
}

// ---------------------------------------------------------------------------
// DetectionHandle
// ---------------------------------------------------------------------------

/// Cloneable handle the detection pipeline uses to submit anchor
/// placements. Commands submitted after the engine is detached are
/// dropped silently.
#[derive(Debug, Clone)]
pub struct DetectionHandle {
    pub(crate) queue: Arc<CommandQueue>,
    pub(crate) live: Arc<AtomicBool>,
}

impl DetectionHandle {
    /// Queue a new anchor at a detected object's world position.
    pub fn place_anchor(&self, element: Element, position: Point3<f32>) {
        self.submit(AnchorCommand::Place { element, position });
    }

    /// Queue removal of every live anchor.
    pub fn clear_anchors(&self) {
        self.submit(AnchorCommand::Clear);
    }

    fn submit(&self, command: AnchorCommand) {
        if !self.live.load(Ordering::Acquire) {
            tracing::trace!(?command, "anchor command dropped: engine detached");
            return;
        }
        self.queue.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn handle() -> (DetectionHandle, Arc<CommandQueue>) {
        let queue = Arc::new(CommandQueue::new());
        let handle = DetectionHandle {
            queue: Arc::clone(&queue),
            live: Arc::new(AtomicBool::new(true)),
        };
        (handle, queue)
    }

    #[test]
    fn drain_preserves_submission_order() {
        let (h, queue) = handle();
        h.place_anchor(Element::Fire, Point3::new(0.0, 0.0, -1.0));
        h.clear_anchors();
        h.place_anchor(Element::Wood, Point3::new(1.0, 0.0, -1.0));

        let drained = queue.drain();
        assert_eq!(drained.len(), 3);
        assert!(matches!(drained[0], AnchorCommand::Place { element: Element::Fire, .. }));
        assert!(matches!(drained[1], AnchorCommand::Clear));
        assert!(matches!(drained[2], AnchorCommand::Place { element: Element::Wood, .. }));
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn detached_handle_drops_commands() {
        let queue = Arc::new(CommandQueue::new());
        let h = DetectionHandle {
            queue: Arc::clone(&queue),
            live: Arc::new(AtomicBool::new(false)),
        };
        h.place_anchor(Element::Metal, Point3::new(0.0, 0.0, -2.0));
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn concurrent_submissions_all_arrive() {
        let (h, queue) = handle();
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let h = h.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        h.place_anchor(Element::Earth, Point3::new(i as f32, 0.0, -1.0));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(queue.drain().len(), 200);
    }
}

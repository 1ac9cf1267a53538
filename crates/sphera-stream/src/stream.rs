//! The description stream state machine.
//!
//! One caption stream at a time: `Idle -> Streaming -> Completed -> Idle`.
//! Starting a new stream while one is active overwrites it (the partial
//! buffer is lost); the generation counter lets subscribers tell a
//! restarted stream's tokens from the previous one's.
//!
//! Tokens may arrive from the analysis thread while the UI thread reads
//! the buffer for display, so all state lives behind one mutex and reads
//! clone the buffer out. Append order is arrival order; nothing is
//! trimmed or deduplicated.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Phases and events
// ---------------------------------------------------------------------------

/// Lifecycle phase of the description stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPhase {
    /// No analysis in flight, buffer empty.
    #[default]
    Idle,
    /// Tokens are being appended.
    Streaming,
    /// The caption is final until the next `start()` or `clear()`.
    Completed,
}

/// Transition notifications delivered to subscribers in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Started { generation: u64 },
    Token { generation: u64, text: String },
    Completed { generation: u64, caption: String },
    Cleared,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct StreamInner {
    phase: StreamPhase,
    buffer: String,
    generation: u64,
    subscribers: Vec<Sender<StreamEvent>>,
}

impl StreamInner {
    /// Send an event to every subscriber, pruning the disconnected.
    fn broadcast(&mut self, event: StreamEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Cloneable handle to the caption stream. The analysis thread mutates it
/// through one clone while the UI thread reads another.
#[derive(Debug, Clone, Default)]
pub struct DescriptionStream {
    inner: Arc<Mutex<StreamInner>>,
}

impl DescriptionStream {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StreamInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begin a new stream. Valid from any phase; an active stream's
    /// partial buffer is discarded.
    pub fn start(&self) {
        let mut inner = self.lock();
        inner.phase = StreamPhase::Streaming;
        inner.buffer.clear();
        inner.generation += 1;
        let generation = inner.generation;
        debug!(generation, "description stream started");
        inner.broadcast(StreamEvent::Started { generation });
    }

    /// Append a token verbatim, in arrival order. Ignored outside
    /// `Streaming`.
    pub fn append_token(&self, text: &str) {
        let mut inner = self.lock();
        if inner.phase != StreamPhase::Streaming {
            trace!(token = text, phase = ?inner.phase, "token ignored outside streaming");
            return;
        }
        inner.buffer.push_str(text);
        let generation = inner.generation;
        inner.broadcast(StreamEvent::Token {
            generation,
            text: text.to_owned(),
        });
    }

    /// Freeze the buffer and return the final caption. A no-op returning
    /// `None` unless the stream is `Streaming`.
    pub fn complete(&self) -> Option<String> {
        let mut inner = self.lock();
        if inner.phase != StreamPhase::Streaming {
            trace!(phase = ?inner.phase, "complete ignored outside streaming");
            return None;
        }
        inner.phase = StreamPhase::Completed;
        let caption = inner.buffer.clone();
        let generation = inner.generation;
        debug!(generation, %caption, "description stream completed");
        inner.broadcast(StreamEvent::Completed {
            generation,
            caption: caption.clone(),
        });
        Some(caption)
    }

    /// Reset to `Idle` from any phase, emptying the buffer.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.phase = StreamPhase::Idle;
        inner.buffer.clear();
        inner.broadcast(StreamEvent::Cleared);
    }

    /// The caption accumulated so far (or frozen, once completed). Safe
    /// to call while the analysis thread is appending.
    pub fn caption(&self) -> String {
        self.lock().buffer.clone()
    }

    pub fn phase(&self) -> StreamPhase {
        self.lock().phase
    }

    /// Monotone counter bumped by every `start()`.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Register a subscriber. Events from this point on are delivered in
    /// transition order; a dropped receiver is pruned on the next send.
    pub fn subscribe(&self) -> Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }
}

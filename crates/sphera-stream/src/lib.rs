//! Sphera Stream -- the description stream coordinator and the bridge to
//! the external vision/detection service.
//!
//! The vision service analyzes camera frames on its own thread and emits
//! an object description as an incremental token stream: analysis starts,
//! tokens arrive one by one, analysis completes. [`stream::DescriptionStream`]
//! buffers that stream so the UI can render a live caption overlay while
//! tokens are still arriving, without blocking either side.
//!
//! [`detect::DetectionBridge`] is the callback surface the service
//! drives: it forwards the token lifecycle into the stream and, on
//! completion, submits detected objects as anchor placements through the
//! engine's [`sphera_core::command::DetectionHandle`].

pub mod detect;
pub mod stream;

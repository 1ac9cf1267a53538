//! Sphera Core -- the AR anchor and collection engine.
//!
//! This crate provides the spatial and gameplay core behind the element
//! sphere mini-game: projecting 3D anchors into screen space, resolving
//! user taps against them, gating collection by the active "needed
//! element", and tracking collection counts per session.
//!
//! # Frame Loop Contract
//!
//! The host AR session drives the engine once per frame:
//!
//! 1. [`engine::CollectionEngine::begin_frame`] -- apply anchor commands
//!    queued by the detection pipeline since the last frame.
//! 2. [`engine::CollectionEngine::resolve_pending_tap`] -- consume the
//!    pending tap (if any) and attempt a collection against the current
//!    camera pose.
//! 3. [`engine::CollectionEngine::visible_anchors`] -- project eligible
//!    anchors for the UI overlay.
//! 4. [`engine::CollectionEngine::drain_events`] -- hand buffered engine
//!    events to the UI.
//!
//! Taps are submitted from the input thread through a [`tap::TapHandle`]
//! (lock-free single-slot queue, overwrite semantics); anchor placements
//! from the detection thread go through a [`command::DetectionHandle`] and
//! are only applied at frame boundaries, so the frame thread stays the
//! sole mutator of the anchor store.
//!
//! # Key Types
//!
//! - [`engine::CollectionEngine`] -- engine context owning all session
//!   state; no globals.
//! - [`projection::CameraPose`] -- per-frame view/projection matrices and
//!   viewport; [`projection::project`] is the pure world-to-pixel mapping.
//! - [`anchor::AnchorStore`] -- slotmap-backed store of live anchors.
//! - [`collection::CollectionState`] -- needed-element filter and
//!   monotone collection counter.
//! - [`event::EngineEvent`] -- ring-buffered events drained by the UI.
//! - [`snapshot::EngineSnapshot`] -- versioned binary session snapshots
//!   via bitcode.

pub mod anchor;
pub mod collection;
pub mod command;
pub mod config;
pub mod element;
pub mod engine;
pub mod event;
pub mod id;
pub mod projection;
pub mod snapshot;
pub mod tap;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

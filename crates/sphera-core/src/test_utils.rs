//! Shared test helpers for unit, integration, and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the same
//! fixtures serve in-crate tests and the cross-crate integration suite.

use crate::config::EngineConfig;
use crate::engine::{Collected, CollectionEngine};
use crate::projection::{CameraPose, Viewport};
use nalgebra::Point3;

/// An 800x600 identity pose: world coordinates are view coordinates and
/// NDC at the same time, so `(0, 0, -1)` projects to the viewport center
/// at `(400, 300)`.
pub fn identity_pose() -> CameraPose {
    CameraPose::identity(Viewport::new(800.0, 600.0))
}

/// A fresh engine with the default configuration. Default config is
/// validated; construction cannot fail.
pub fn engine() -> CollectionEngine {
    match CollectionEngine::new(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(e) => panic!("default config must validate: {e}"),
    }
}

/// A fresh engine with a custom tap threshold.
pub fn engine_with_threshold(tap_threshold_px: f32) -> CollectionEngine {
    match CollectionEngine::new(EngineConfig::with_threshold(tap_threshold_px)) {
        Ok(engine) => engine,
        Err(e) => panic!("test config must validate: {e}"),
    }
}

/// Shorthand for a world-space point.
pub fn world(x: f32, y: f32, z: f32) -> Point3<f32> {
    Point3::new(x, y, z)
}

/// Submit a tap through the public handle and resolve it in one step.
pub fn tap_and_resolve(
    engine: &mut CollectionEngine,
    pose: &CameraPose,
    x: f32,
    y: f32,
) -> Option<Collected> {
    engine.tap_handle().tap(x, y);
    engine.resolve_pending_tap(pose)
}

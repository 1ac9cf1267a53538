//! World-to-screen projection math.
//!
//! Convention: column-major matrices with column vectors
//! (`clip = proj * view * world`), camera looking down -Z in view space.
//! Screen-space Y grows downward, so the NDC Y axis is flipped when
//! mapping to pixels.
//!
//! [`project`] is a pure function: identical inputs always produce the
//! identical pixel result, which is what the hit-testing tests rely on.

use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Pixel dimensions of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A projected position in screen pixels. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean pixel distance to another screen point.
    pub fn distance_to(self, other: ScreenPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Camera state for one frame: view and projection matrices plus the
/// viewport they target. Supplied by the host's pose provider every frame.
#[derive(Debug, Clone)]
pub struct CameraPose {
    pub view: Matrix4<f32>,
    pub proj: Matrix4<f32>,
    pub viewport: Viewport,
}

impl CameraPose {
    pub fn new(view: Matrix4<f32>, proj: Matrix4<f32>, viewport: Viewport) -> Self {
        Self {
            view,
            proj,
            viewport,
        }
    }

    /// Identity view and projection matrices over the given viewport.
    /// World coordinates are then already in view space, which keeps
    /// fixture geometry trivial to reason about.
    pub fn identity(viewport: Viewport) -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity(), viewport)
    }

    /// Project a world point through this pose. See [`project`].
    pub fn project(&self, world: Point3<f32>) -> Option<ScreenPoint> {
        project(world, &self.view, &self.proj, self.viewport)
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Map a world-space point to screen pixels.
///
/// Returns `None` when the point does not project: at or behind the
/// camera plane (view-space `z >= 0`), or with a degenerate clip-space
/// `w`. A non-projecting anchor is simply "not visible" -- it is never an
/// error.
pub fn project(
    world: Point3<f32>,
    view: &Matrix4<f32>,
    proj: &Matrix4<f32>,
    viewport: Viewport,
) -> Option<ScreenPoint> {
    let eye = view * world.to_homogeneous();

    // Camera forward is -Z: anything at or behind the camera plane is
    // rejected before the projection matrix can fold it back in front.
    if eye.z >= 0.0 {
        return None;
    }

    let clip = proj * eye;
    if clip.w.abs() <= f32::EPSILON {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;

    Some(ScreenPoint {
        x: (ndc_x + 1.0) * viewport.width / 2.0,
        y: (1.0 - ndc_y) * viewport.height / 2.0,
    })
}

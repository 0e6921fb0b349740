//! Pointer-ray to ground-plane target resolution.
//!
//! The host's camera utility turns normalized pointer coordinates into a
//! world-space ray; the resolver's only job is intersecting that ray with the
//! fixed horizontal reference plane at y = 0.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera-to-pointer ray supplied by the host.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Direction, not required to be normalized.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// Below this vertical component the ray counts as grazing the plane.
pub const GRAZE_EPSILON: f32 = 1e-6;

/// Intersect the ray with the horizontal plane y = 0.
///
/// Returns `None` when the ray is parallel to the plane, points away from it,
/// or carries non-finite components. The caller keeps its previous target in
/// that case; the next frame naturally retries.
pub fn intersect_ground(ray: &Ray) -> Option<Vec3> {
    if !ray.origin.is_finite() || !ray.dir.is_finite() {
        return None;
    }
    if ray.dir.y.abs() < GRAZE_EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.dir.y;
    if t < 0.0 {
        return None;
    }
    let point = ray.origin + ray.dir * t;
    point.is_finite().then_some(point)
}

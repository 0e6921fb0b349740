//! Output contract from the engine.
//!
//! Outputs carry the per-joint angle writes for this frame, keyed by the
//! resolved target handle, plus discrete tracking events. Binding layers
//! apply changes to scene nodes and surface events however they see fit.

use serde::{Deserialize, Serialize};

use crate::chain::RotationAxis;
use crate::limits::Joint;

/// One joint angle to write onto a scene node this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Resolved handle (canonical path when unbound),
    /// e.g. `wrist/Transform.rotation.x`.
    pub key: String,
    pub joint: Joint,
    /// Local axis the angle applies to, so hosts need not parse the key.
    pub axis: RotationAxis,
    /// Smoothed, clamped angle in radians.
    pub angle: f32,
}

/// Discrete signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    /// The pointer ray stopped intersecting the ground plane; the pose holds
    /// until tracking resumes.
    TrackingLost,
    TrackingRegained,
    /// The pose was returned to rest by `Command::Reset`.
    PoseReset,
}

/// Outputs returned by `Engine::update()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}

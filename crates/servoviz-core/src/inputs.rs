//! Input contract for the engine.
//!
//! Adapters build one `Inputs` per rendered frame from host state and pass it
//! into `Engine::update()`. Everything here is ephemeral; the engine keeps no
//! reference to it after the call returns.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::target::Ray;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    /// Pointer state for this frame. `None` while the host has no cursor
    /// (e.g. assets still loading, pointer outside the canvas); the update is
    /// skipped and the pose holds.
    #[serde(default)]
    pub pointer: Option<PointerSample>,
    /// End-effector world position measured by the host scene graph. When
    /// absent the engine falls back to forward kinematics over the chain.
    #[serde(default)]
    pub effector_world: Option<Vec3>,
    /// Commands applied before stepping.
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// One pointer reading plus the camera ray derived from it by the host.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Pointer position normalized to [-1, 1] on both axes (x right, y up).
    pub ndc: Vec2,
    /// Camera-to-pointer ray from the host's camera utility.
    pub ray: Ray,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Return the pose to rest and drop the stale target (the original
    /// rebuilds its state this way when the visualization remounts).
    Reset,
}

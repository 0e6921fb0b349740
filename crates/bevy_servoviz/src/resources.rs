use bevy::prelude::*;
use std::collections::HashMap;

use servoviz_core::{Change, Engine, Inputs};

/// The core engine as a Bevy resource.
#[derive(Resource)]
pub struct ServovizEngine(pub Engine);

/// Canonical handle (e.g. `wrist/Transform.rotation.x`) to the entity whose
/// `Transform` the angle applies to. Populated by the binding system by
/// walking under `ServovizRoot`.
#[derive(Resource, Default)]
pub struct BindingIndex {
    pub map: HashMap<String, Entity>,
}

/// Inputs staged by the gather system for the tick system.
#[derive(Resource, Default)]
pub struct FrameInputs(pub Inputs);

/// Changes staged from `Engine::update` to be applied in a separate system
/// (keeps ordering explicit: Gather -> Compute -> Apply).
#[derive(Resource, Default)]
pub struct PendingOutputs {
    pub changes: Vec<Change>,
}

//! Bevy plugin that wraps the servoviz pose core.
//!
//! The plugin owns the full per-frame loop: gather pointer/camera inputs,
//! tick the core, apply the resulting joint angles onto the spawned chain's
//! `Transform`s. The core never sees the ECS; everything crosses through
//! `Inputs`/`Outputs`.

use bevy::prelude::*;
use servoviz_core::{Config, Engine};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{ArmSegment, EndEffector, ServovizRoot};
pub use resources::{BindingIndex, FrameInputs, PendingOutputs, ServovizEngine};
pub use systems::spawn_chain;

pub struct ServovizPlugin {
    pub config: Config,
    /// Spawn the built-in chain at startup. Disable to spawn a custom rig
    /// with [`spawn_chain`] instead.
    pub spawn_standard_chain: bool,
}

impl Default for ServovizPlugin {
    fn default() -> Self {
        Self {
            config: Config::default(),
            spawn_standard_chain: true,
        }
    }
}

impl Plugin for ServovizPlugin {
    fn build(&self, app: &mut App) {
        let engine = match Engine::with_standard_rig(self.config.clone()) {
            Ok(engine) => engine,
            Err(err) => {
                error!("servoviz: invalid rig configuration: {err}");
                return;
            }
        };

        app.insert_resource(ServovizEngine(engine))
            .init_resource::<BindingIndex>()
            .init_resource::<FrameInputs>()
            .init_resource::<PendingOutputs>();

        if self.spawn_standard_chain {
            app.add_systems(Startup, systems::spawn_chain_system);
        }
        app.add_systems(
            PostStartup,
            (
                systems::build_binding_index_system,
                systems::prebind_core_system,
            )
                .chain(),
        );
        app.add_systems(
            Update,
            (
                systems::gather_inputs_system,
                systems::tick_engine_system,
                systems::apply_outputs_system,
            )
                .chain(),
        );
    }
}

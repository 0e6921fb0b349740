//! Servoviz core (engine-agnostic).
//!
//! Pointer-tracking robot-arm pose logic: the kinematic chain and joint
//! limits, the pointer-ray -> ground-plane target resolver, and the per-frame
//! pose updater (clamp-then-smooth exponential easing). Binding layers
//! (Bevy, wasm) feed `Inputs` in and push the resulting `Outputs` onto scene
//! nodes; this crate performs no rendering and no I/O.

pub mod binding;
pub mod chain;
pub mod config;
pub mod engine;
pub mod inputs;
pub mod limits;
pub mod outputs;
pub mod pose;
pub mod rig;
pub mod target;

// Re-exports for consumers (adapters)
pub use binding::{canonical_path, BindingTable, TargetResolver};
pub use chain::{ChainSpec, JointBinding, RotationAxis, Segment, SegmentId};
pub use config::{BaseYawPolicy, Config};
pub use engine::Engine;
pub use inputs::{Command, Inputs, PointerSample};
pub use limits::{AngleRange, Joint, JointLimits};
pub use outputs::{Change, CoreEvent, Outputs};
pub use pose::{update_pose, Pose, ResolvedFrame};
pub use rig::{parse_rig_json, Rig, RigError};
pub use target::{intersect_ground, Ray};

//! Engine: owns the rig and pose state, steps the per-frame update.
//!
//! One `update()` per rendered frame, resolver strictly before updater, on
//! the host's rendering thread. The engine never touches a scene graph; it
//! emits `Change` records for the binding layer to apply.

use glam::Vec3;

use crate::binding::{canonical_path, BindingTable, TargetResolver};
use crate::chain::{ChainSpec, RotationAxis, SegmentId};
use crate::config::Config;
use crate::inputs::{Command, Inputs};
use crate::limits::{Joint, JointLimits};
use crate::outputs::{Change, CoreEvent, Outputs};
use crate::pose::{update_pose, Pose, ResolvedFrame};
use crate::rig::{Rig, RigError};
use crate::target::intersect_ground;

/// Joints the updater derives targets for each frame; the rest hold their
/// rest angle.
fn is_driven(joint: Joint) -> bool {
    matches!(
        joint,
        Joint::BaseYaw | Joint::ShoulderYaw | Joint::WristPitch | Joint::Gripper | Joint::Jaw
    )
}

pub struct Engine {
    cfg: Config,
    limits: JointLimits,
    chain: ChainSpec,

    // Frame-persistent animation state.
    pose: Pose,
    /// Last successfully resolved target; retained across missed frames.
    target: Option<Vec3>,
    tracking: bool,

    /// Driven joints in chain order: (joint, owning segment, axis).
    driven: Vec<(Joint, SegmentId, RotationAxis)>,
    effector: SegmentId,

    binds: BindingTable,
    outputs: Outputs,
    warned_bad_dt: bool,
}

impl Engine {
    /// Build an engine from parts, validating the rig invariants up front.
    pub fn new(cfg: Config, chain: ChainSpec, limits: JointLimits) -> Result<Self, RigError> {
        cfg.validate()?;
        chain.validate()?;
        limits.validate()?;
        let effector = chain.end_effector().ok_or(RigError::MissingEndEffector)?;

        let driven = chain
            .segments
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.joint
                    .filter(|b| is_driven(b.joint))
                    .map(|b| (b.joint, SegmentId(i as u32), b.axis))
            })
            .collect();

        Ok(Self {
            cfg,
            limits,
            chain,
            pose: Pose::rest(),
            target: None,
            tracking: true,
            driven,
            effector,
            binds: BindingTable::new(),
            outputs: Outputs::default(),
            warned_bad_dt: false,
        })
    }

    /// The built-in arm with the given tuning.
    pub fn with_standard_rig(cfg: Config) -> Result<Self, RigError> {
        Self::new(cfg, ChainSpec::standard(), JointLimits::standard())
    }

    pub fn from_rig(rig: Rig) -> Result<Self, RigError> {
        Self::new(rig.config, rig.chain, rig.limits)
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Last resolved ground-plane target, if any frame has resolved one.
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn limits(&self) -> &JointLimits {
        &self.limits
    }

    pub fn chain(&self) -> &ChainSpec {
        &self.chain
    }

    /// Current end-effector world position: host-measured value when given,
    /// forward kinematics otherwise.
    pub fn effector_world(&self, measured: Option<Vec3>) -> Vec3 {
        measured
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| self.chain.world_position(self.effector, &self.pose))
    }

    /// Return the pose to rest and drop the stale target.
    pub fn reset(&mut self) {
        self.pose = Pose::rest();
        self.target = None;
        self.tracking = true;
    }

    /// One-time canonical-path -> handle resolution against the host.
    /// Unresolved paths keep the canonical string as their key.
    pub fn prebind(&mut self, resolver: &mut dyn TargetResolver) {
        for (joint, path) in self.canonical_paths() {
            if let Some(handle) = resolver.resolve(&path) {
                self.binds.upsert(joint, handle);
            }
        }
    }

    /// Step the animation by `dt` seconds with this frame's inputs.
    ///
    /// The only in-core failure is the pointer ray missing the ground plane;
    /// that frame's update is skipped (pose holds) and a `TrackingLost`
    /// event marks the transition. No error is ever returned.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> &Outputs {
        self.outputs.clear();

        for command in &inputs.commands {
            match command {
                Command::Reset => {
                    self.reset();
                    self.outputs.push_event(CoreEvent::PoseReset);
                }
            }
        }

        let Some(pointer) = inputs.pointer else {
            return &self.outputs;
        };

        if !dt.is_finite() || dt < 0.0 {
            if !self.warned_bad_dt {
                log::warn!("servoviz: ignoring frame with bad dt {dt}");
                self.warned_bad_dt = true;
            }
            return &self.outputs;
        }

        let resolved = if pointer.ndc.is_finite() {
            intersect_ground(&pointer.ray)
        } else {
            None
        };

        let Some(point) = resolved else {
            if self.tracking {
                self.tracking = false;
                self.outputs.push_event(CoreEvent::TrackingLost);
            }
            return &self.outputs;
        };
        if !self.tracking {
            self.tracking = true;
            self.outputs.push_event(CoreEvent::TrackingRegained);
        }
        self.target = Some(point);

        let frame = ResolvedFrame {
            pointer_x: pointer.ndc.x,
            target: point,
            effector: self.effector_world(inputs.effector_world),
        };
        self.pose = update_pose(&self.pose, &frame, dt, &self.cfg, &self.limits);
        self.emit_changes();

        &self.outputs
    }

    /// Canonical `(joint, path)` pairs for every driven joint, chain order.
    pub fn canonical_paths(&self) -> Vec<(Joint, String)> {
        self.driven
            .iter()
            .filter_map(|&(joint, id, axis)| {
                self.chain
                    .segment(id)
                    .map(|s| (joint, canonical_path(&s.name, axis)))
            })
            .collect()
    }

    fn emit_changes(&mut self) {
        for &(joint, id, axis) in &self.driven {
            let key = match self.binds.get(joint) {
                Some(handle) => handle.to_string(),
                None => {
                    let name = self.chain.segment(id).map(|s| s.name.as_str()).unwrap_or("");
                    canonical_path(name, axis)
                }
            };
            self.outputs.push_change(Change {
                key,
                joint,
                axis,
                angle: self.pose.angle(joint),
            });
        }
    }
}

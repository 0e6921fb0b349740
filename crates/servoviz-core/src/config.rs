//! Tuning constants for the tracking behavior.

use serde::{Deserialize, Serialize};

use crate::rig::RigError;

/// How base yaw follows the pointer's horizontal position.
///
/// Both mappings appear in the original effect's history; which one is active
/// changes the visible behavior when the pointer crosses screen center, so the
/// choice is an explicit, constructed-once setting rather than an implicit
/// constant.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum BaseYawPolicy {
    /// Sweep toward -pi left of center (`-pi + x*pi`) and toward +pi right of
    /// center (`pi - x*pi`). The branches meet at +/-pi at screen center --
    /// the same orientation modulo a full turn -- so crossing center never
    /// pops.
    #[default]
    SplitSweep,
    /// Plain linear mapping `x*pi`, continuous through 0 at center.
    Linear,
}

/// Engine tuning. Immutable after construction; passed by reference into the
/// pose updater.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Smoothing rate for base yaw (1/s). Lower than the joint rate so the
    /// whole model turns more deliberately than the wrist and gripper.
    pub base_rate: f32,
    /// Smoothing rate for the remaining animated joints (1/s).
    pub joint_rate: f32,
    /// Distance to the target at which the gripper starts closing, in world
    /// units.
    pub closing_threshold: f32,
    #[serde(default)]
    pub base_yaw_policy: BaseYawPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_rate: 3.0,
            joint_rate: 5.0,
            closing_threshold: 0.1,
            base_yaw_policy: BaseYawPolicy::default(),
        }
    }
}

impl Config {
    /// Rates and threshold must be finite and positive.
    pub fn validate(&self) -> Result<(), RigError> {
        for (name, value) in [
            ("base_rate", self.base_rate),
            ("joint_rate", self.joint_rate),
            ("closing_threshold", self.closing_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RigError::InvalidConfig { name, value });
            }
        }
        Ok(())
    }
}

//! Persistent pose state and the pure per-frame pose update.
//!
//! `update_pose` is side-effect free: it derives target angles from the
//! frame's resolved geometry, clamps each to its joint's range, eases the
//! current angle toward the clamped target, and returns the next pose. The
//! engine owns applying the result; binding layers own the scene graph.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::config::{BaseYawPolicy, Config};
use crate::limits::{Joint, JointLimits};

/// Per-joint current angles; the only state that survives between frames.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    angles: [f32; Joint::COUNT],
}

impl Pose {
    /// All joints at zero (gripper fully open, arm straight ahead).
    pub fn rest() -> Self {
        Self {
            angles: [0.0; Joint::COUNT],
        }
    }

    #[inline]
    pub fn angle(&self, joint: Joint) -> f32 {
        self.angles[joint.index()]
    }

    #[inline]
    pub fn set_angle(&mut self, joint: Joint, angle: f32) {
        self.angles[joint.index()] = angle;
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::rest()
    }
}

/// Everything the updater needs for one frame, already resolved.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedFrame {
    /// Pointer's horizontal coordinate, normalized to [-1, 1].
    pub pointer_x: f32,
    /// World-space target point on the ground plane.
    pub target: Vec3,
    /// World-space end-effector (gripper) position.
    pub effector: Vec3,
}

/// Target angle for base/whole-model yaw under the configured policy.
pub fn base_yaw_target(pointer_x: f32, policy: BaseYawPolicy) -> f32 {
    match policy {
        BaseYawPolicy::SplitSweep => {
            if pointer_x < 0.0 {
                -PI + pointer_x * PI
            } else {
                PI - pointer_x * PI
            }
        }
        BaseYawPolicy::Linear => pointer_x * PI,
    }
}

/// Horizontal bearing from the chain origin to the target, local XZ plane.
pub fn shoulder_yaw_target(target: Vec3) -> f32 {
    target.x.atan2(target.z)
}

/// Raw gripper/jaw opening: fully open when far from the target, closing
/// sharply inside the threshold distance. Clamped to [0, pi] by the limits.
pub fn grip_target(effector: Vec3, target: Vec3, closing_threshold: f32) -> f32 {
    (closing_threshold - effector.distance(target)) * PI
}

/// Wrist pitch toward the target; negated so the wrist points up-and-toward
/// rather than diving below the plane.
pub fn wrist_pitch_target(effector: Vec3, target: Vec3) -> f32 {
    let rise = target.y - effector.y;
    let run = Vec3::new(target.x - effector.x, 0.0, target.z - effector.z).length();
    -rise.atan2(run)
}

/// One exponential easing step toward `target`.
///
/// The result is strictly between `current` and `target` (never overshoots)
/// and frame-rate independent: for a held target the remaining error after
/// total elapsed time T is `e^(-rate*T)` however T is split into frames.
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

fn drive(next: &mut Pose, joint: Joint, raw: f32, rate: f32, dt: f32, limits: &JointLimits) {
    // Clamp-then-smooth: the current angle can never pass a hard limit, even
    // transiently.
    let clamped = limits.clamp(joint, raw);
    let eased = smooth_toward(next.angle(joint), clamped, rate, dt);
    next.set_angle(joint, eased);
}

/// Pure per-frame update. Joints with no derived target (shoulder pitch,
/// elbow, wrist roll) hold their current angle.
pub fn update_pose(
    pose: &Pose,
    frame: &ResolvedFrame,
    dt: f32,
    cfg: &Config,
    limits: &JointLimits,
) -> Pose {
    let mut next = *pose;

    drive(
        &mut next,
        Joint::BaseYaw,
        base_yaw_target(frame.pointer_x, cfg.base_yaw_policy),
        cfg.base_rate,
        dt,
        limits,
    );
    drive(
        &mut next,
        Joint::ShoulderYaw,
        shoulder_yaw_target(frame.target),
        cfg.joint_rate,
        dt,
        limits,
    );

    let grip = grip_target(frame.effector, frame.target, cfg.closing_threshold);
    drive(&mut next, Joint::Gripper, grip, cfg.joint_rate, dt, limits);
    // The jaw mirrors the gripper exactly.
    drive(&mut next, Joint::Jaw, grip, cfg.joint_rate, dt, limits);

    drive(
        &mut next,
        Joint::WristPitch,
        wrist_pitch_target(frame.effector, frame.target),
        cfg.joint_rate,
        dt,
        limits,
    );

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sweep_meets_at_half_turn_at_center() {
        let left = base_yaw_target(-1e-4, BaseYawPolicy::SplitSweep);
        let right = base_yaw_target(1e-4, BaseYawPolicy::SplitSweep);
        // Same orientation modulo a full turn.
        assert!((left + PI).abs() < 1e-3);
        assert!((right - PI).abs() < 1e-3);
    }

    #[test]
    fn linear_policy_is_continuous_through_zero() {
        assert_eq!(base_yaw_target(0.0, BaseYawPolicy::Linear), 0.0);
        assert!((base_yaw_target(0.5, BaseYawPolicy::Linear) - PI / 2.0).abs() < 1e-6);
        assert!((base_yaw_target(-0.5, BaseYawPolicy::Linear) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn smoothing_never_overshoots() {
        let next = smooth_toward(0.0, 1.0, 5.0, 10.0);
        assert!(next > 0.0 && next < 1.0);
        let back = smooth_toward(1.0, 0.0, 5.0, 10.0);
        assert!(back > 0.0 && back < 1.0);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        assert_eq!(smooth_toward(0.25, 1.0, 5.0, 0.0), 0.25);
    }
}

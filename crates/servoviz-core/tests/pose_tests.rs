use glam::Vec3;
use std::f32::consts::PI;

use servoviz_core::pose::{
    base_yaw_target, grip_target, shoulder_yaw_target, smooth_toward, update_pose,
    wrist_pitch_target, Pose, ResolvedFrame,
};
use servoviz_core::{BaseYawPolicy, Config, Joint, JointLimits};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn frame(pointer_x: f32, target: Vec3, effector: Vec3) -> ResolvedFrame {
    ResolvedFrame {
        pointer_x,
        target,
        effector,
    }
}

const DRIVEN: [Joint; 5] = [
    Joint::BaseYaw,
    Joint::ShoulderYaw,
    Joint::WristPitch,
    Joint::Gripper,
    Joint::Jaw,
];

/// Clamped target per driven joint, recomputed the way the updater does.
fn clamped_targets(f: &ResolvedFrame, cfg: &Config, limits: &JointLimits) -> Vec<(Joint, f32)> {
    let grip = grip_target(f.effector, f.target, cfg.closing_threshold);
    DRIVEN
        .iter()
        .map(|&joint| {
            let raw = match joint {
                Joint::BaseYaw => base_yaw_target(f.pointer_x, cfg.base_yaw_policy),
                Joint::ShoulderYaw => shoulder_yaw_target(f.target),
                Joint::WristPitch => wrist_pitch_target(f.effector, f.target),
                Joint::Gripper | Joint::Jaw => grip,
                _ => unreachable!(),
            };
            (joint, limits.clamp(joint, raw))
        })
        .collect()
}

/// it should keep every angle inside its joint's range under adversarial
/// pointer movement, even with huge frame times
#[test]
fn clamp_invariant_under_adversarial_input() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let mut pose = Pose::rest();

    let frames = [
        frame(1.0, Vec3::new(100.0, 0.0, -100.0), Vec3::new(-50.0, 80.0, 3.0)),
        frame(-1.0, Vec3::new(-100.0, 0.0, 1e-4), Vec3::new(0.0, -5.0, 0.0)),
        frame(0.7, Vec3::new(0.0, 0.0, -1e-4), Vec3::ZERO),
        frame(-0.3, Vec3::new(5.0, 0.0, 5.0), Vec3::new(5.0, 0.0, 5.0)),
    ];
    for f in frames.iter().cycle().take(64) {
        pose = update_pose(&pose, f, 10.0, &cfg, &limits);
        for joint in Joint::ALL {
            let range = limits.get(joint);
            assert!(
                range.contains(pose.angle(joint)),
                "{joint:?} angle {} outside [{}, {}]",
                pose.angle(joint),
                range.min,
                range.max
            );
        }
    }
}

/// it should ease strictly between the previous angle and the clamped target
#[test]
fn smoothing_stays_strictly_between() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let pose = Pose::rest();
    let f = frame(0.4, Vec3::new(0.2, 0.0, 0.4), Vec3::new(0.0, 0.3, 0.0));

    let next = update_pose(&pose, &f, 0.016, &cfg, &limits);
    for (joint, target) in clamped_targets(&f, &cfg, &limits) {
        let before = pose.angle(joint);
        let after = next.angle(joint);
        if (target - before).abs() < 1e-9 {
            approx(after, before, 1e-9);
        } else if target > before {
            assert!(after > before && after < target, "{joint:?}: {before} -> {after} (target {target})");
        } else {
            assert!(after < before && after > target, "{joint:?}: {before} -> {after} (target {target})");
        }
    }
}

/// it should converge monotonically toward a held target and never oscillate
/// past it
#[test]
fn held_target_converges_monotonically() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let f = frame(-0.6, Vec3::new(-0.3, 0.0, 0.5), Vec3::new(0.1, 0.4, 0.1));
    let targets = clamped_targets(&f, &cfg, &limits);

    let mut pose = Pose::rest();
    let mut gaps: Vec<f32> = targets
        .iter()
        .map(|&(joint, t)| (t - pose.angle(joint)).abs())
        .collect();
    let signs: Vec<f32> = targets
        .iter()
        .map(|&(joint, t)| (t - pose.angle(joint)).signum())
        .collect();

    for _ in 0..200 {
        pose = update_pose(&pose, &f, 0.05, &cfg, &limits);
        for (i, &(joint, t)) in targets.iter().enumerate() {
            let gap = (t - pose.angle(joint)).abs();
            assert!(gap <= gaps[i] + 1e-6, "{joint:?} gap grew: {} -> {gap}", gaps[i]);
            if gap > 1e-6 {
                // Never crosses to the other side of the target.
                assert_eq!((t - pose.angle(joint)).signum(), signs[i], "{joint:?} oscillated");
            }
            gaps[i] = gap;
        }
    }
    for (i, gap) in gaps.iter().enumerate() {
        assert!(*gap < 1e-3, "joint {i} did not converge (gap {gap})");
    }
}

/// it should land on the same angles whether the elapsed time comes as one
/// frame or many (held target, exact up to float rounding)
#[test]
fn frame_rate_independent_for_held_target() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let f = frame(0.25, Vec3::new(0.15, 0.0, 0.3), Vec3::new(0.05, 0.35, 0.05));

    let one = update_pose(&Pose::rest(), &f, 1.0, &cfg, &limits);

    let mut many = Pose::rest();
    for _ in 0..10 {
        many = update_pose(&many, &f, 0.1, &cfg, &limits);
    }

    for joint in DRIVEN {
        approx(one.angle(joint), many.angle(joint), 1e-4);
    }
}

/// it should aim the shoulder straight ahead when the target is dead center
#[test]
fn dead_center_shoulder_bearing_is_zero() {
    approx(shoulder_yaw_target(Vec3::new(0.0, 0.0, 0.5)), 0.0, 1e-9);
    approx(shoulder_yaw_target(Vec3::new(0.0, 0.0, 2.0)), 0.0, 1e-9);
}

/// it should close the gripper partially inside the threshold distance
#[test]
fn gripper_closes_inside_threshold() {
    let limits = JointLimits::standard();
    // distance 0.05 with threshold 0.1 -> (0.1 - 0.05) * pi
    let raw = grip_target(Vec3::ZERO, Vec3::new(0.05, 0.0, 0.0), 0.1);
    let clamped = limits.clamp(Joint::Gripper, raw);
    approx(clamped, 0.05 * PI, 1e-6);
    assert!(clamped >= 0.0 && clamped <= PI);
}

/// it should clamp the gripper fully open when the target is out of reach
#[test]
fn gripper_opens_fully_when_far() {
    let limits = JointLimits::standard();
    let raw = grip_target(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), 0.1);
    assert!(raw < 0.0);
    approx(limits.clamp(Joint::Gripper, raw), 0.0, 1e-9);
}

/// it should pitch the wrist up (negative angle) toward a target above the
/// effector
#[test]
fn wrist_pitch_points_up_and_toward() {
    let effector = Vec3::ZERO;
    let above = Vec3::new(0.0, 1.0, 1.0);
    approx(wrist_pitch_target(effector, above), -PI / 4.0, 1e-6);

    let below = Vec3::new(0.0, -1.0, 1.0);
    approx(wrist_pitch_target(effector, below), PI / 4.0, 1e-6);
}

/// it should sweep base yaw toward the matching half-turn under SplitSweep
/// and clamp the far-left overshoot at the limit
#[test]
fn split_sweep_edges_and_clamp() {
    let limits = JointLimits::standard();
    // Far right maps to 0, far left overshoots to -2*pi and clamps at -pi.
    approx(base_yaw_target(1.0, BaseYawPolicy::SplitSweep), 0.0, 1e-6);
    let far_left = base_yaw_target(-1.0, BaseYawPolicy::SplitSweep);
    approx(far_left, -2.0 * PI, 1e-6);
    approx(limits.clamp(Joint::BaseYaw, far_left), -PI, 1e-6);
}

/// it should mirror the jaw onto the gripper exactly, frame after frame
#[test]
fn jaw_mirrors_gripper() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let mut pose = Pose::rest();
    let f = frame(0.1, Vec3::new(0.05, 0.0, 0.08), Vec3::new(0.0, 0.05, 0.0));
    for _ in 0..32 {
        pose = update_pose(&pose, &f, 0.016, &cfg, &limits);
        approx(pose.angle(Joint::Jaw), pose.angle(Joint::Gripper), 1e-9);
    }
}

/// it should leave the underived joints at rest
#[test]
fn underived_joints_hold_rest() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let f = frame(0.9, Vec3::new(0.4, 0.0, -0.2), Vec3::new(0.1, 0.3, 0.1));
    let next = update_pose(&Pose::rest(), &f, 0.5, &cfg, &limits);
    for joint in [Joint::ShoulderPitch, Joint::Elbow, Joint::WristRoll] {
        approx(next.angle(joint), 0.0, 1e-9);
    }
}

/// it should obey the Linear policy when configured
#[test]
fn linear_policy_drives_base_through_center() {
    let cfg = Config {
        base_yaw_policy: BaseYawPolicy::Linear,
        ..Config::default()
    };
    let limits = JointLimits::standard();
    let f = frame(0.0, Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.3, 0.0));

    let mut pose = Pose::rest();
    for _ in 0..400 {
        pose = update_pose(&pose, &f, 0.05, &cfg, &limits);
    }
    // Linear: center pointer keeps the base at 0. SplitSweep would head to pi.
    approx(pose.angle(Joint::BaseYaw), 0.0, 1e-4);

    let split = Config::default();
    let mut pose = Pose::rest();
    for _ in 0..400 {
        pose = update_pose(&pose, &f, 0.05, &split, &limits);
    }
    approx(pose.angle(Joint::BaseYaw), PI, 1e-3);
}

/// it should not move at all when dt is zero
#[test]
fn zero_dt_holds_the_pose() {
    let cfg = Config::default();
    let limits = JointLimits::standard();
    let f = frame(0.8, Vec3::new(0.3, 0.0, 0.1), Vec3::new(0.0, 0.2, 0.0));
    let mut pose = Pose::rest();
    pose = update_pose(&pose, &f, 0.1, &cfg, &limits);
    let frozen = update_pose(&pose, &f, 0.0, &cfg, &limits);
    assert_eq!(frozen, pose);
}

/// it should expose the documented smoothing identity: remaining error decays
/// by e^(-rate*dt) each step
#[test]
fn smoothing_decay_matches_closed_form() {
    let start = 0.2_f32;
    let target = 1.0_f32;
    let rate = 5.0_f32;
    let dt = 0.016_f32;
    let stepped = smooth_toward(start, target, rate, dt);
    let expected = target + (start - target) * (-rate * dt).exp();
    approx(stepped, expected, 1e-6);
}

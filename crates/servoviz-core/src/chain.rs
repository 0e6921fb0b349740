//! Kinematic chain: arena of rigid segments with parent-relative rest
//! transforms.
//!
//! Segments are stored in topological order (parents strictly before
//! children), so forward kinematics is a single pass and the tree can hold no
//! cycles by construction. Each segment owns at most one animated joint; the
//! renderable part itself belongs to the host scene graph.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::limits::Joint;
use crate::pose::Pose;
use crate::rig::RigError;

/// Index of a segment in the chain arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u32);

/// Axis a joint rotates about, in the segment's local frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            RotationAxis::X => Vec3::X,
            RotationAxis::Y => Vec3::Y,
            RotationAxis::Z => Vec3::Z,
        }
    }

    /// Lowercase axis letter used in canonical target paths.
    #[inline]
    pub fn letter(self) -> &'static str {
        match self {
            RotationAxis::X => "x",
            RotationAxis::Y => "y",
            RotationAxis::Z => "z",
        }
    }
}

/// An animated degree of freedom attached to a segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct JointBinding {
    pub joint: Joint,
    pub axis: RotationAxis,
}

/// One rigid part of the arm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Canonical name, unique within the chain (used in target paths).
    pub name: String,
    /// Parent segment; `None` only for the root.
    pub parent: Option<SegmentId>,
    /// Rest offset in the parent's frame.
    pub translation: Vec3,
    /// Rest orientation in the parent's frame, intrinsic XYZ euler (radians).
    pub rotation: [f32; 3],
    /// Uniform scale; 1.0 everywhere except the root.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Animated joint, if this segment rotates.
    #[serde(default)]
    pub joint: Option<JointBinding>,
}

fn default_scale() -> f32 {
    1.0
}

impl Segment {
    fn rest_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
        )
    }

    /// Local transform with the joint angle applied after the rest pose.
    pub fn local_matrix(&self, angle: f32) -> Mat4 {
        let joint_quat = match self.joint {
            Some(binding) => Quat::from_axis_angle(binding.axis.unit(), angle),
            None => Quat::IDENTITY,
        };
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rest_quat() * joint_quat,
            self.translation,
        )
    }

    fn is_finite(&self) -> bool {
        self.translation.is_finite()
            && self.rotation.iter().all(|r| r.is_finite())
            && self.scale.is_finite()
    }
}

/// Arena-stored chain; parents always precede children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub segments: Vec<Segment>,
}

impl ChainSpec {
    /// The stock arm, with rest transforms recovered from the original
    /// seven-part model (plus the moving jaw).
    pub fn standard() -> Self {
        fn seg(
            name: &str,
            parent: Option<u32>,
            t: [f32; 3],
            r: [f32; 3],
            joint: Option<(Joint, RotationAxis)>,
        ) -> Segment {
            Segment {
                name: name.to_string(),
                parent: parent.map(SegmentId),
                translation: Vec3::from_array(t),
                rotation: r,
                scale: 1.0,
                joint: joint.map(|(joint, axis)| JointBinding { joint, axis }),
            }
        }

        let mut base = seg(
            "base",
            None,
            [0.0, -0.2, 0.0],
            [0.0, 0.0, 0.0],
            Some((Joint::BaseYaw, RotationAxis::Y)),
        );
        base.scale = DESKTOP_ROOT_SCALE;

        Self {
            segments: vec![
                base,
                seg(
                    "shoulder",
                    Some(0),
                    [0.0, 0.02, 0.05],
                    [FRAC_PI_2, 0.0, -FRAC_PI_2],
                    Some((Joint::ShoulderYaw, RotationAxis::Y)),
                ),
                seg(
                    "upper_arm",
                    Some(1),
                    [0.000125, 0.001, -0.11],
                    [0.0, 0.0, PI],
                    Some((Joint::ShoulderPitch, RotationAxis::X)),
                ),
                seg(
                    "lower_arm",
                    Some(2),
                    [-0.1138, 0.0005, -0.03],
                    [0.0, FRAC_PI_4, PI],
                    Some((Joint::Elbow, RotationAxis::X)),
                ),
                seg(
                    "wrist",
                    Some(3),
                    [-0.1102, 0.005375, 0.0],
                    [FRAC_PI_2, FRAC_PI_2, 0.0],
                    Some((Joint::WristPitch, RotationAxis::X)),
                ),
                seg(
                    "wrist_roll",
                    Some(4),
                    [0.0, -0.03, -0.005],
                    [FRAC_PI_2, -FRAC_PI_2, PI],
                    Some((Joint::WristRoll, RotationAxis::Y)),
                ),
                seg(
                    "gripper",
                    Some(5),
                    [0.0, 0.0, 0.0],
                    [0.0, 0.0, 0.0],
                    Some((Joint::Gripper, RotationAxis::Y)),
                ),
                seg(
                    "jaw",
                    Some(6),
                    [0.027, 0.022, -0.001],
                    [FRAC_PI_2, PI, PI],
                    Some((Joint::Jaw, RotationAxis::Y)),
                ),
            ],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0 as usize)
    }

    pub fn find(&self, name: &str) -> Option<SegmentId> {
        self.segments
            .iter()
            .position(|s| s.name == name)
            .map(|i| SegmentId(i as u32))
    }

    /// The segment driving a given joint.
    pub fn segment_for_joint(&self, joint: Joint) -> Option<SegmentId> {
        self.segments
            .iter()
            .position(|s| s.joint.map(|b| b.joint) == Some(joint))
            .map(|i| SegmentId(i as u32))
    }

    /// The gripper segment, whose world position drives reach behaviors.
    pub fn end_effector(&self) -> Option<SegmentId> {
        self.segment_for_joint(Joint::Gripper)
    }

    /// World-space position of a segment's origin under the given pose
    /// (forward kinematics over the rest transforms).
    pub fn world_position(&self, id: SegmentId, pose: &Pose) -> Vec3 {
        self.world_matrix(id, pose).transform_point3(Vec3::ZERO)
    }

    pub fn world_matrix(&self, id: SegmentId, pose: &Pose) -> Mat4 {
        // Parents precede children, so locals compose in one forward pass.
        let mut world = vec![Mat4::IDENTITY; self.segments.len()];
        for (i, segment) in self.segments.iter().enumerate() {
            if i > id.0 as usize {
                break;
            }
            let angle = segment
                .joint
                .map(|b| pose.angle(b.joint))
                .unwrap_or_default();
            let local = segment.local_matrix(angle);
            world[i] = match segment.parent {
                Some(p) => world[p.0 as usize] * local,
                None => local,
            };
        }
        world[id.0 as usize]
    }

    /// Structural invariants: one root at index 0, parents strictly before
    /// children, unique non-empty names, unique joints, finite transforms.
    pub fn validate(&self) -> Result<(), RigError> {
        if self.segments.is_empty() {
            return Err(RigError::EmptyChain);
        }
        let roots = self.segments.iter().filter(|s| s.parent.is_none()).count();
        if roots != 1 {
            return Err(RigError::RootCount(roots));
        }

        let mut names = hashbrown::HashSet::new();
        let mut joints = hashbrown::HashSet::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if segment.name.is_empty() || !names.insert(segment.name.as_str()) {
                return Err(RigError::DuplicateSegment(segment.name.clone()));
            }
            match segment.parent {
                None if i != 0 => return Err(RigError::RootCount(roots)),
                Some(p) if p.0 as usize >= i => {
                    return Err(RigError::ParentOrder {
                        name: segment.name.clone(),
                        parent: p.0,
                    });
                }
                _ => {}
            }
            if !segment.is_finite() {
                return Err(RigError::NonFiniteTransform(segment.name.clone()));
            }
            if let Some(binding) = segment.joint {
                if !joints.insert(binding.joint) {
                    return Err(RigError::DuplicateJoint {
                        joint: binding.joint,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Root scale on a desktop viewport.
pub const DESKTOP_ROOT_SCALE: f32 = 1.8;
/// Root scale below the mobile breakpoint.
pub const MOBILE_ROOT_SCALE: f32 = 1.3;
const MOBILE_BREAKPOINT_PX: f32 = 768.0;

/// Viewport-responsive root scale (the original shrinks the whole model on
/// narrow screens).
pub fn root_scale_for_width(width_px: f32) -> f32 {
    if width_px < MOBILE_BREAKPOINT_PX {
        MOBILE_ROOT_SCALE
    } else {
        DESKTOP_ROOT_SCALE
    }
}

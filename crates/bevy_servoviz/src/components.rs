use bevy::prelude::*;
use servoviz_core::{JointBinding, SegmentId};

/// Marker component designating the root of a spawned chain.
/// The binding system walks descendants of any entity with this marker.
#[derive(Component)]
pub struct ServovizRoot;

/// Per-segment data the apply system needs: which joint (if any) drives this
/// node, and the rest orientation the joint angle composes onto.
#[derive(Component, Debug, Clone)]
pub struct ArmSegment {
    pub id: SegmentId,
    pub joint: Option<JointBinding>,
    pub rest_rotation: Quat,
}

/// Marker for the end-effector (gripper) entity, whose world position feeds
/// the engine's reach behaviors.
#[derive(Component)]
pub struct EndEffector;

//! Joint identifiers and per-joint angular limits.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI};

use crate::rig::RigError;

/// One rotational degree of freedom in the kinematic chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Joint {
    BaseYaw,
    ShoulderYaw,
    ShoulderPitch,
    Elbow,
    WristPitch,
    WristRoll,
    Gripper,
    Jaw,
}

impl Joint {
    pub const COUNT: usize = 8;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::BaseYaw,
        Joint::ShoulderYaw,
        Joint::ShoulderPitch,
        Joint::Elbow,
        Joint::WristPitch,
        Joint::WristRoll,
        Joint::Gripper,
        Joint::Jaw,
    ];

    /// Dense index for array-backed per-joint tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Closed angular range [min, max] in radians.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, angle: f32) -> f32 {
        angle.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle <= self.max
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Immutable limit table, one range per joint. Constructed once at startup
/// and passed by reference into the updater.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    ranges: [AngleRange; Joint::COUNT],
}

impl JointLimits {
    /// The stock arm's limit table.
    pub fn standard() -> Self {
        let mut ranges = [AngleRange::new(0.0, 0.0); Joint::COUNT];
        ranges[Joint::BaseYaw.index()] = AngleRange::new(-PI, PI);
        ranges[Joint::ShoulderYaw.index()] = AngleRange::new(-FRAC_PI_2, FRAC_PI_2);
        ranges[Joint::ShoulderPitch.index()] = AngleRange::new(-FRAC_PI_4, FRAC_PI_2);
        ranges[Joint::Elbow.index()] = AngleRange::new(-FRAC_PI_3, FRAC_PI_3);
        ranges[Joint::WristPitch.index()] = AngleRange::new(-FRAC_PI_2, FRAC_PI_2);
        ranges[Joint::WristRoll.index()] = AngleRange::new(-FRAC_PI_2, FRAC_PI_2);
        ranges[Joint::Gripper.index()] = AngleRange::new(0.0, PI);
        ranges[Joint::Jaw.index()] = AngleRange::new(0.0, PI);
        Self { ranges }
    }

    #[inline]
    pub fn get(&self, joint: Joint) -> AngleRange {
        self.ranges[joint.index()]
    }

    pub fn set(&mut self, joint: Joint, range: AngleRange) {
        self.ranges[joint.index()] = range;
    }

    #[inline]
    pub fn clamp(&self, joint: Joint, angle: f32) -> f32 {
        self.get(joint).clamp(angle)
    }

    /// Every range must satisfy min <= max with finite endpoints.
    pub fn validate(&self) -> Result<(), RigError> {
        for joint in Joint::ALL {
            let range = self.get(joint);
            if !range.is_valid() {
                return Err(RigError::InvalidRange {
                    joint,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

impl Default for JointLimits {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_valid() {
        let limits = JointLimits::standard();
        assert!(limits.validate().is_ok());
        assert_eq!(limits.get(Joint::Gripper).min, 0.0);
        assert_eq!(limits.get(Joint::BaseYaw).max, PI);
    }

    #[test]
    fn clamp_respects_range() {
        let limits = JointLimits::standard();
        assert_eq!(limits.clamp(Joint::Gripper, -1.0), 0.0);
        assert_eq!(limits.clamp(Joint::Gripper, 4.0), PI);
        assert_eq!(limits.clamp(Joint::Gripper, 0.5), 0.5);
    }

    #[test]
    fn inverted_range_rejected() {
        let mut limits = JointLimits::standard();
        limits.set(Joint::Elbow, AngleRange::new(1.0, -1.0));
        assert!(matches!(
            limits.validate(),
            Err(RigError::InvalidRange {
                joint: Joint::Elbow,
                ..
            })
        ));
    }
}

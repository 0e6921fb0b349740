//! Rig description: the JSON shape a host ships next to its model assets,
//! bundling a chain, limit overrides, and tuning.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::ChainSpec;
use crate::config::Config;
use crate::limits::{Joint, JointLimits};

/// Construction-time failures. These are the only fallible surface; frame
/// updates never error.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("rig JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("chain has no segments")]
    EmptyChain,
    #[error("chain must have exactly one root at index 0, found {0} root(s)")]
    RootCount(usize),
    #[error("segment `{name}` references parent {parent} at or after itself")]
    ParentOrder { name: String, parent: u32 },
    #[error("segment name `{0}` is empty or duplicated")]
    DuplicateSegment(String),
    #[error("joint {joint:?} is bound to more than one segment")]
    DuplicateJoint { joint: Joint },
    #[error("segment `{0}` has a non-finite rest transform")]
    NonFiniteTransform(String),
    #[error("chain has no gripper segment to use as the end-effector")]
    MissingEndEffector,
    #[error("limit range for {joint:?} is inverted or non-finite (min {min}, max {max})")]
    InvalidRange { joint: Joint, min: f32, max: f32 },
    #[error("config `{name}` must be finite and positive (got {value})")]
    InvalidConfig { name: &'static str, value: f32 },
}

/// A complete arm description. Limits and config fall back to the standard
/// tables when the JSON omits them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    pub chain: ChainSpec,
    #[serde(default)]
    pub limits: JointLimits,
    #[serde(default)]
    pub config: Config,
}

impl Rig {
    /// The built-in arm.
    pub fn standard() -> Self {
        Self {
            chain: ChainSpec::standard(),
            limits: JointLimits::standard(),
            config: Config::default(),
        }
    }

    pub fn validate(&self) -> Result<(), RigError> {
        self.config.validate()?;
        self.chain.validate()?;
        self.limits.validate()?;
        if self.chain.end_effector().is_none() {
            return Err(RigError::MissingEndEffector);
        }
        Ok(())
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parse and validate a rig from JSON.
pub fn parse_rig_json(s: &str) -> Result<Rig, RigError> {
    let rig: Rig = serde_json::from_str(s)?;
    rig.validate()?;
    Ok(rig)
}

//! Canonical target paths and host handle resolution.
//!
//! Each animated joint has a canonical path derived from its segment name and
//! rotation axis. `Engine::prebind()` runs every path through a host resolver
//! exactly once; unresolved paths fall back to the canonical string so a host
//! without a resolver still gets stable keys.

use hashbrown::HashMap;

use crate::chain::RotationAxis;
use crate::limits::Joint;

/// Canonical path for an animated joint's rotation component.
pub fn canonical_path(segment_name: &str, axis: RotationAxis) -> String {
    format!("{segment_name}/Transform.rotation.{}", axis.letter())
}

/// Trait for resolving canonical paths to host-specific handles.
/// Binding layers (Bevy/WASM) implement this and pass it to `prebind()`.
pub trait TargetResolver {
    fn resolve(&mut self, path: &str) -> Option<String>;
}

/// Resolved handle per joint, populated by `prebind()`.
#[derive(Clone, Debug, Default)]
pub struct BindingTable {
    handles: HashMap<Joint, String>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    pub fn get(&self, joint: Joint) -> Option<&str> {
        self.handles.get(&joint).map(String::as_str)
    }

    pub fn upsert(&mut self, joint: Joint, handle: String) {
        self.handles.insert(joint, handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_path_shape() {
        assert_eq!(
            canonical_path("wrist", RotationAxis::X),
            "wrist/Transform.rotation.x"
        );
    }

    #[test]
    fn upsert_replaces_existing_handle() {
        let mut table = BindingTable::new();
        table.upsert(Joint::BaseYaw, "a".into());
        table.upsert(Joint::BaseYaw, "b".into());
        assert_eq!(table.get(Joint::BaseYaw), Some("b"));
    }
}

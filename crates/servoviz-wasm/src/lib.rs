//! wasm-bindgen wrapper for the servoviz pose core.
//!
//! The web host keeps the scene graph and camera; this class keeps the pose.
//! Each animation frame the host passes `Inputs` JSON (pointer NDC, camera
//! ray, measured gripper position) and applies the returned changes to its
//! scene nodes.

use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use servoviz_core::{parse_rig_json, Config, Engine, Inputs, Outputs, TargetResolver};

#[wasm_bindgen]
pub struct ServovizArm {
    core: Engine,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

struct JsResolver {
    f: Function,
}

impl TargetResolver for JsResolver {
    fn resolve(&mut self, path: &str) -> Option<String> {
        // Call JS resolver(path); expect a string handle, null/undefined for
        // unresolved. A throwing resolver counts as unresolved.
        let arg = JsValue::from_str(path);
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(val) => {
                if jsvalue_is_undefined_or_null(&val) {
                    return None;
                }
                val.as_string()
            }
            Err(_) => None,
        }
    }
}

#[wasm_bindgen]
impl ServovizArm {
    /// Create an arm with the built-in rig. Pass a JSON config object or
    /// undefined/null for defaults.
    /// Example:
    ///   new ServovizArm({ joint_rate: 8.0 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ServovizArm, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let core = Engine::with_standard_rig(cfg)
            .map_err(|e| JsError::new(&format!("rig error: {e}")))?;
        Ok(ServovizArm { core })
    }

    /// Replace the arm with one described by rig JSON (chain + limits +
    /// tuning). The pose restarts at rest.
    #[wasm_bindgen(js_name = load_rig)]
    pub fn load_rig(&mut self, rig_json: String) -> Result<(), JsError> {
        let rig = parse_rig_json(&rig_json)
            .map_err(|e| JsError::new(&format!("load_rig error: {e}")))?;
        self.core =
            Engine::from_rig(rig).map_err(|e| JsError::new(&format!("load_rig error: {e}")))?;
        Ok(())
    }

    /// Resolve canonical joint paths to host handles using a JS callback.
    /// The resolver is called as `resolver(path: string) -> string | null`.
    #[wasm_bindgen]
    pub fn prebind(&mut self, resolver: Function) {
        let mut js_resolver = JsResolver { f: resolver };
        self.core.prebind(&mut js_resolver);
    }

    /// Step the animation by dt (seconds) with inputs JSON. Returns Outputs
    /// JSON (`{ changes, events }`).
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self.core.update(dt, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Return the pose to rest and drop the stale target (remount).
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Current per-joint angles as JSON.
    #[wasm_bindgen]
    pub fn pose(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.core.pose()).map_err(|e| JsError::new(&format!("pose error: {e}")))
    }

    /// Canonical `[joint, path]` pairs for every driven joint, for hosts that
    /// want to pre-register scene nodes before calling `prebind`.
    #[wasm_bindgen(js_name = canonical_paths)]
    pub fn canonical_paths(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.canonical_paths())
            .map_err(|e| JsError::new(&format!("paths error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

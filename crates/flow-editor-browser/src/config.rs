//! Reading [`InputConfig`] from JavaScript.

use wasm_bindgen::prelude::*;

use flow_editor_core::InputConfig;

/// Deserialize an input config from a JS object.
///
/// `undefined` and `null` give the defaults; missing fields take their
/// default values.
pub fn config_from_js(value: JsValue) -> Result<InputConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(InputConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid input config: {}", e)))
}

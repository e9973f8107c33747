//! JavaScript value conversion helpers.
//!
//! This module centralizes the conversion between core Cropview types and
//! JavaScript values. Structured data crosses the boundary through
//! serde-wasm-bindgen, so points arrive as `{x, y}` objects, sizes as
//! `{width, height}`, and engine outputs as arrays of tagged
//! `{type, value}` objects.

use cropview_core::Point;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Serialize a core value into a JavaScript value.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Deserialize a JavaScript value into a core value.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Read a JavaScript array of `{x, y}` objects as touch points.
///
/// Order matters: the first two entries drive pinch distance and midpoint.
pub(crate) fn touches_from_array(touches: &js_sys::Array) -> Result<Vec<Point>, JsValue> {
    touches.iter().map(from_js).collect()
}

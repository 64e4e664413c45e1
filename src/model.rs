// src/model.rs

//! Structural checks on caller-supplied config models.
//!
//! The repository never looks at individual fields. It only requires that a
//! model serializes to a JSON object, which rules out `None`, scalars and
//! sequences while accepting any struct (or string-keyed map).

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::errors::{JsonfigError, Result};

/// Check that `model` is record-shaped and return its JSON document.
pub fn check_model<M: Serialize + ?Sized>(model: &M) -> Result<Value> {
    let value = serde_json::to_value(model)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(JsonfigError::InvalidConfigModel)
    }
}

/// Serialize `model` as tab-indented JSON, keeping declared field order.
pub fn to_skeleton_json<M: Serialize + ?Sized>(model: &M) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    model.serialize(&mut ser)?;
    Ok(buf)
}

/// Overlay a decoded document onto a model's current document.
///
/// Objects merge key by key (recursively), `null` leaves the target alone and
/// anything else replaces it.
pub fn merge_document(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_document(existing, value),
                    None if !value.is_null() => {
                        base_map.insert(key, value);
                    }
                    None => {}
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

//! Deep merge of JSON config trees
//!
//! - Objects: merged key by key (recursive)
//! - Arrays: concatenated (base items first)
//! - Scalars: overlay wins

use serde_json::{Map, Value};

/// Deep merge `overlay` into `base`, returning the merged value.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (Value::Array(mut base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }
        (_, overlay) => overlay,
    }
}

/// Object form of [`deep_merge`], used for top-level configs.
pub fn merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => {
                let existing = slot.take();
                *slot = deep_merge(existing, overlay_value);
            }
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
    base
}

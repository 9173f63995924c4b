//! Deep merge of YAML configuration layers.
//!
//! Layers are converted to `serde_json::Value` before merging. Objects merge
//! key by key; everything else is replaced by the higher layer.

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// A null in the overlay means "not specified" and keeps the base value.
///
/// ```
/// use serde_json::json;
/// use taskflow::config::deep_merge;
///
/// let base = json!({"server": {"host": "127.0.0.1", "port": 2009}});
/// let overlay = json!({"server": {"port": 8080}});
/// assert_eq!(
///     deep_merge(base, overlay),
///     json!({"server": {"host": "127.0.0.1", "port": 8080}})
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let next = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, next);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold `deep_merge` over layers, later layers winning.
pub fn deep_merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keys_merge_individually() {
        let base = json!({"server": {"host": "127.0.0.1", "port": 2009, "static_dir": "public"}});
        let overlay = json!({"server": {"port": 3000}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"server": {"host": "127.0.0.1", "port": 3000, "static_dir": "public"}})
        );
    }

    #[test]
    fn null_keeps_base_value() {
        let base = json!({"server": {"port": 2009}});
        let overlay = json!({"server": {"port": null}});
        assert_eq!(deep_merge(base, overlay), json!({"server": {"port": 2009}}));
    }

    #[test]
    fn scalars_and_arrays_are_replaced() {
        assert_eq!(deep_merge(json!([1, 2]), json!([3])), json!([3]));
        assert_eq!(deep_merge(json!({"a": {"b": 1}}), json!({"a": 5})), json!({"a": 5}));
    }

    #[test]
    fn later_layers_win() {
        let merged = deep_merge_all(vec![
            json!({"server": {"port": 1}}),
            json!({"server": {"host": "0.0.0.0"}}),
            json!({"server": {"port": 3}}),
        ]);
        assert_eq!(merged, json!({"server": {"port": 3, "host": "0.0.0.0"}}));
    }
}

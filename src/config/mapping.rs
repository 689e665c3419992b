//! Untyped configuration mapping with dot-path lookup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed configuration document.
///
/// No schema is enforced. Values are whatever the file contained: strings,
/// numbers, bools, nested mappings or sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    /// `true` if no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the mapping into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Looks up a dot-separated key path such as `"mm.lt.index_dir"`.
    ///
    /// Returns `None` as soon as a segment is missing or the value reached so
    /// far is not a mapping. Never fails for any key string.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Dot-path lookup falling back to `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    /// Dot-path lookup of a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Dot-path lookup of a boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Dot-path lookup of an integer value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Free-function form of [`Config::get_or`].
pub fn get_config_value<'a>(cfg: &'a Config, key: &str, default: &'a Value) -> &'a Value {
    cfg.get_or(key, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> Config {
        match value {
            Value::Object(map) => Config::from(map),
            other => panic!("test fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn get_walks_nested_mappings() {
        let cfg = config(json!({"mm": {"lt": {"index_dir": "/idx"}}}));
        assert_eq!(cfg.get("mm.lt.index_dir"), Some(&json!("/idx")));
        assert_eq!(cfg.get("mm.lt"), Some(&json!({"index_dir": "/idx"})));
    }

    #[test]
    fn get_missing_segment_returns_default() {
        let cfg = config(json!({"a": {"b": 1}}));
        let default = json!("fallback");
        assert_eq!(cfg.get_or("a.x", &default), &default);
        assert_eq!(cfg.get_or("z", &default), &default);
    }

    #[test]
    fn get_through_non_mapping_returns_default() {
        let cfg = config(json!({"a": 5, "list": [{"b": 1}]}));
        let default = Value::Null;
        assert_eq!(cfg.get_or("a.b", &default), &Value::Null);
        assert_eq!(cfg.get_or("list.0", &default), &Value::Null);
        assert_eq!(cfg.get_or("list.b", &default), &Value::Null);
    }

    #[test]
    fn get_is_total_for_odd_keys() {
        let cfg = config(json!({"": {"": 1}, "a": {"b": 2}}));
        assert_eq!(cfg.get(""), Some(&json!({"": 1})));
        assert_eq!(cfg.get("."), Some(&json!(1)));
        assert_eq!(cfg.get("a..b"), None);
        assert_eq!(cfg.get("a.b."), None);
        assert_eq!(Config::default().get("anything.at.all"), None);
    }

    #[test]
    fn get_is_idempotent() {
        let cfg = config(json!({"a": {"b": [1, 2]}}));
        let first = cfg.get("a.b").cloned();
        let second = cfg.get("a.b").cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn typed_getters() {
        let cfg = config(json!({"s": "x", "b": true, "n": 7, "f": 1.5}));
        assert_eq!(cfg.get_str("s"), Some("x"));
        assert_eq!(cfg.get_bool("b"), Some(true));
        assert_eq!(cfg.get_i64("n"), Some(7));
        assert_eq!(cfg.get_i64("f"), None);
        assert_eq!(cfg.get_str("n"), None);
    }

    #[test]
    fn free_function_matches_method() {
        let cfg = config(json!({"a": 1}));
        let default = json!(0);
        assert_eq!(get_config_value(&cfg, "a", &default), &json!(1));
        assert_eq!(get_config_value(&cfg, "b", &default), &json!(0));
    }

    #[test]
    fn serializes_as_plain_object() {
        let cfg = config(json!({"a": 1}));
        let text = serde_json::to_string(&cfg).expect("serialize");
        assert_eq!(text, r#"{"a":1}"#);
    }
}

//! Nested configuration with `/`-delimited path lookup.

use serde_json::Value;

/// Configuration dictionary shared through the registry.
///
/// Keys accept a `/`-delimited path into nested objects: `"renderer/soft_break"`
/// reads `config["renderer"]["soft_break"]`. A missing segment or a
/// non-object intermediate yields the caller's default, never an error.
#[derive(Debug, Clone, Default)]
pub struct Config {
    root: Value,
}

impl Config {
    /// Wrap a configuration value. Anything but an object makes every
    /// path lookup miss, which is harmless but probably not intended.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The full configuration dictionary.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a value by path.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut data = &self.root;
        for segment in key.split('/') {
            data = data.as_object()?.get(segment)?;
        }
        Some(data)
    }

    /// Look up a value by path, falling back to `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    /// Recursively merge `other` into this configuration. Objects merge
    /// key by key; any other value replaces the existing one.
    pub(crate) fn merge(&mut self, other: Value) {
        merge_value(&mut self.root, other);
    }

    pub(crate) fn replace(&mut self, other: Value) {
        self.root = other;
    }
}

fn merge_value(base: &mut Value, other: Value) {
    match (base, other) {
        (Value::Object(base_map), Value::Object(other_map)) => {
            for (key, value) in other_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, other) => *base = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_lookup_walks_nested_objects() {
        let config = Config::new(json!({"renderer": {"soft_break": "\n"}}));
        assert_eq!(config.get("renderer/soft_break"), Some(&json!("\n")));
        assert_eq!(config.get("renderer"), Some(&json!({"soft_break": "\n"})));
    }

    #[test]
    fn missing_segment_returns_default() {
        let config = Config::new(json!({"a": {"b": 1}}));
        let default = json!(42);
        assert_eq!(config.get("a/missing"), None);
        assert_eq!(config.get_or("a/missing", &default), &default);
    }

    #[test]
    fn non_object_intermediate_returns_default() {
        let config = Config::new(json!({"a": 7}));
        assert_eq!(config.get("a/b"), None);
    }

    #[test]
    fn merge_is_recursive_for_objects() {
        let mut config = Config::new(json!({"a": {"x": 1, "y": 2}, "keep": true}));
        config.merge(json!({"a": {"y": 3, "z": 4}}));
        assert_eq!(config.get("a/x"), Some(&json!(1)));
        assert_eq!(config.get("a/y"), Some(&json!(3)));
        assert_eq!(config.get("a/z"), Some(&json!(4)));
        assert_eq!(config.get("keep"), Some(&json!(true)));
    }

    #[test]
    fn merge_replaces_non_objects() {
        let mut config = Config::new(json!({"a": [1, 2]}));
        config.merge(json!({"a": "text"}));
        assert_eq!(config.get("a"), Some(&json!("text")));
    }
}

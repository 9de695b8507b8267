//! Core configuration types: [`ConfigValue`] and the layered [`Config`] map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ConfigValue
// ---------------------------------------------------------------------------

/// A single configuration value: a string or a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    /// Borrow the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Strings render verbatim; primitives use their natural text form.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// An ordered key/value configuration layer.
///
/// Layers are combined with [`Config::merge`], which always produces a new
/// map and leaves both inputs untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(BTreeMap<String, ConfigValue>);

impl Config {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a key, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Look up a key holding a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge `overrides` on top of this layer.
    ///
    /// The result holds every key of `self`; keys also present in `overrides`
    /// take the override's value. `None` behaves like an empty layer.
    pub fn merge(&self, overrides: Option<&Config>) -> Config {
        let mut merged = self.clone();
        if let Some(overrides) = overrides {
            for (key, value) in &overrides.0 {
                merged.0.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config::new().with("a", "1").with("b", "2").with("n", 7_i64)
    }

    #[test]
    fn merge_with_nothing_is_identity() {
        let base = base();
        assert_eq!(base.merge(None), base);
        assert_eq!(base.merge(Some(&Config::new())), base);
    }

    #[test]
    fn merge_prefers_override_values() {
        let base = base();
        let overrides = Config::new().with("b", "two").with("c", true);

        let merged = base.merge(Some(&overrides));

        assert_eq!(merged.get_str("a"), Some("1"));
        assert_eq!(merged.get_str("b"), Some("two"));
        assert_eq!(merged.get("c"), Some(&ConfigValue::Bool(true)));
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let base = base();
        let snapshot = base.clone();
        let overrides = Config::new().with("a", "changed");
        let overrides_snapshot = overrides.clone();

        let _ = base.merge(Some(&overrides));

        assert_eq!(base, snapshot);
        assert_eq!(overrides, overrides_snapshot);
    }

    #[test]
    fn display_renders_primitives() {
        assert_eq!(ConfigValue::from("x/").to_string(), "x/");
        assert_eq!(ConfigValue::from(42_i64).to_string(), "42");
        assert_eq!(ConfigValue::from(false).to_string(), "false");
    }

    #[test]
    fn deserializes_mixed_values_from_toml() {
        let layer: Config = toml::from_str(
            r#"
pagePath = "http://localhost/pages/"
retries = 3
verbose = true
"#,
        )
        .expect("parse layer");

        assert_eq!(layer.get_str("pagePath"), Some("http://localhost/pages/"));
        assert_eq!(layer.get("retries"), Some(&ConfigValue::Int(3)));
        assert_eq!(layer.get("verbose"), Some(&ConfigValue::Bool(true)));
    }

    #[test]
    fn collects_from_pairs() {
        let layer: Config = [("x", "y")].into_iter().collect();
        assert_eq!(layer.get_str("x"), Some("y"));
        assert!(layer.contains_key("x"));
        assert_eq!(layer.keys().collect::<Vec<_>>(), vec!["x"]);
    }
}

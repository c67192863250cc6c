//! # Attribute Access
//!
//! Snapshot entities carry their attributes as string→string maps, exactly
//! as parsed from the document format. This module is the single place
//! where those strings are interpreted: booleans are the literal `"true"`,
//! floats are decimal, identifiers are UUID strings.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::ids::parse_non_nil_uuid;

/// Ordered attribute table of one snapshot entity.
///
/// `BTreeMap` keeps iteration deterministic, which matters downstream:
/// combination-cache keys are built from traversal order.
pub type AttributeMap = BTreeMap<String, String>;

/// Typed read access over an [`AttributeMap`].
///
/// Missing attributes are never an error; every reader has a defined
/// fallback so in-progress documents generate as far as they can.
///
/// # Example
///
/// ```rust
/// use skeletal_model::{AttributeMap, Attributes};
///
/// let mut part = AttributeMap::new();
/// part.insert("rounded".to_string(), "true".to_string());
/// part.insert("deformThickness".to_string(), "0.5".to_string());
///
/// assert!(part.read_bool("rounded"));
/// assert_eq!(part.read_float_or("deformThickness", 1.0), 0.5);
/// assert_eq!(part.read_float_or("deformWidth", 1.0), 1.0);
/// ```
pub trait Attributes {
    /// The attribute's raw string value, or `""` when absent.
    fn str_or_empty(&self, key: &str) -> &str;

    /// True iff the attribute is present and equals `"true"`.
    fn read_bool(&self, key: &str) -> bool;

    /// The attribute parsed as `f64`, or `default` when absent or malformed.
    fn read_float_or(&self, key: &str, default: f64) -> f64;

    /// The attribute parsed as a non-nil UUID, or `None`.
    fn read_uuid(&self, key: &str) -> Option<Uuid>;
}

impl Attributes for AttributeMap {
    fn str_or_empty(&self, key: &str) -> &str {
        self.get(key).map(String::as_str).unwrap_or("")
    }

    fn read_bool(&self, key: &str) -> bool {
        self.str_or_empty(key) == "true"
    }

    fn read_float_or(&self, key: &str, default: f64) -> f64 {
        let value = self.str_or_empty(key);
        if value.is_empty() {
            return default;
        }
        value.parse::<f64>().unwrap_or(default)
    }

    fn read_uuid(&self, key: &str) -> Option<Uuid> {
        parse_non_nil_uuid(self.str_or_empty(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_str_or_empty_missing() {
        let attrs = AttributeMap::new();
        assert_eq!(attrs.str_or_empty("anything"), "");
    }

    #[test]
    fn test_read_bool() {
        let attrs = map(&[("a", "true"), ("b", "false"), ("c", "TRUE")]);
        assert!(attrs.read_bool("a"));
        assert!(!attrs.read_bool("b"));
        // Only the exact lowercase literal counts
        assert!(!attrs.read_bool("c"));
        assert!(!attrs.read_bool("missing"));
    }

    #[test]
    fn test_read_float_or() {
        let attrs = map(&[("x", "1.25"), ("bad", "abc"), ("empty", "")]);
        assert_eq!(attrs.read_float_or("x", 0.0), 1.25);
        assert_eq!(attrs.read_float_or("bad", 2.0), 2.0);
        assert_eq!(attrs.read_float_or("empty", 3.0), 3.0);
        assert_eq!(attrs.read_float_or("missing", 4.0), 4.0);
    }

    #[test]
    fn test_read_uuid() {
        let attrs = map(&[
            ("ok", "f1f2a7d0-1c3e-4f5a-9b8c-0d1e2f3a4b5c"),
            ("nil", "00000000-0000-0000-0000-000000000000"),
            ("preset", "Square"),
        ]);
        assert!(attrs.read_uuid("ok").is_some());
        assert!(attrs.read_uuid("nil").is_none());
        assert!(attrs.read_uuid("preset").is_none());
        assert!(attrs.read_uuid("missing").is_none());
    }
}

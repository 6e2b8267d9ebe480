//! The property bag attached to every vertex and edge.

use std::collections::hash_map::{self, HashMap};

use serde::{Deserialize, Serialize};

use super::Value;

/// A mapping from string keys to typed [`Value`]s.
///
/// The bag only stores values; predicate evaluation lives in the query
/// engine. A missing key reads as `None`, never as [`Value::Null`].
///
/// # Example
///
/// ```
/// use propgraph_core::{Properties, Value};
///
/// let mut props = Properties::new().with("amount", 1.0).with("date", 10i64);
/// assert_eq!(props.get("date"), Some(&Value::Int(10)));
///
/// let previous = props.set("amount", 0.5);
/// assert_eq!(previous, Some(Value::Float(1.0)));
///
/// assert_eq!(props.remove("date"), Some(Value::Int(10)));
/// assert!(props.get("date").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(HashMap<String, Value>);

impl Properties {
    /// Create an empty property bag.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a property value by key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a property value, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a property, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns `true` if the bag holds a value under `key`.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over the property keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs, in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Number of properties in the bag.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the bag is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_none_not_null() {
        let props = Properties::new().with("present", Value::Null);
        assert_eq!(props.get("present"), Some(&Value::Null));
        assert_eq!(props.get("absent"), None);
        assert!(props.contains_key("present"));
        assert!(!props.contains_key("absent"));
    }

    #[test]
    fn set_overwrites_and_returns_previous() {
        let mut props = Properties::new();
        assert_eq!(props.set("k", 1i64), None);
        assert_eq!(props.set("k", "one"), Some(Value::Int(1)));
        assert_eq!(props.get("k"), Some(&Value::from("one")));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn remove_missing_key() {
        let mut props = Properties::new();
        assert_eq!(props.remove("nothing"), None);
        assert!(props.is_empty());
    }

    #[test]
    fn collect_from_pairs() {
        let props: Properties = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        let mut keys: Vec<_> = props.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.iter().count(), 2);
    }
}

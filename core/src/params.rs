//! Named parameter map shared by the path resolver, query builder and cache key.
//!
//! Backed by a `BTreeMap` so iteration is always sorted by name, whatever the
//! insertion order was.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::Display;

/// An ordered `name -> value` map of request parameters.
///
/// An empty-string value is a real value ("explicitly set empty"); an absent
/// key means the parameter was omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style insert that skips `None`.
    pub fn with_opt<V: Display>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(name, value);
        }
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Display) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of `self`; `other` wins on name clashes.
    pub fn merged(&self, other: &Params) -> Params {
        let mut out = self.clone();
        for (name, value) in other.iter() {
            out.0.insert(name.to_string(), value.to_string());
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_sorted_regardless_of_insert_order() {
        let params = Params::new().with("q", "bolt").with("order", "name").with("page", 2);
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["order", "page", "q"]);
    }

    #[test]
    fn merged_prefers_other() {
        let defaults = Params::new().with("format", "json").with("pretty", "");
        let caller = Params::new().with("pretty", "true").with("q", "bolt");
        let merged = defaults.merged(&caller);
        assert_eq!(merged.get("format"), Some("json"));
        assert_eq!(merged.get("pretty"), Some("true"));
        assert_eq!(merged.get("q"), Some("bolt"));
    }

    #[test]
    fn with_opt_skips_none() {
        let params = Params::new().with_opt::<&str>("lang", None).with_opt("set", Some("m21"));
        assert!(!params.contains("lang"));
        assert_eq!(params.get("set"), Some("m21"));
    }
}

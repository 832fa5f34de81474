// ABOUTME: Equality-based label selector identifying a deployment's processes.
// ABOUTME: Matches label sets and renders in the conventional key=value form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A set of `key=value` predicates that must all hold.
///
/// An empty selector matches nothing; a deployment without a selector has no
/// member processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSelector(BTreeMap<String, String>);

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate, returning the extended selector.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether every predicate is satisfied by `labels`.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        !self.0.is_empty()
            && self
                .0
                .iter()
                .all(|(key, value)| labels.get(key) == Some(value))
    }
}

impl FromIterator<(String, String)> for LabelSelector {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn matches_superset_of_labels() {
        let selector = LabelSelector::new()
            .with("deployment", "myapp-3")
            .with("app", "myapp");
        assert!(selector.matches(&labels(&[
            ("app", "myapp"),
            ("deployment", "myapp-3"),
            ("tier", "web"),
        ])));
    }

    #[test]
    fn rejects_mismatched_value() {
        let selector = LabelSelector::new().with("deployment", "myapp-3");
        assert!(!selector.matches(&labels(&[("deployment", "myapp-2")])));
        assert!(!selector.matches(&labels(&[])));
    }

    #[test]
    fn empty_selector_matches_nothing() {
        assert!(!LabelSelector::new().matches(&labels(&[("app", "myapp")])));
    }

    #[test]
    fn displays_sorted_pairs() {
        let selector = LabelSelector::new().with("b", "2").with("a", "1");
        assert_eq!(selector.to_string(), "a=1,b=2");
    }
}

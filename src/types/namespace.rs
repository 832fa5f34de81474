// ABOUTME: DNS-compatible namespace validation.
// ABOUTME: Ensures namespaces follow RFC 1123 label requirements.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("namespace parameter required")]
    Empty,

    #[error("namespace exceeds maximum length of 63 characters")]
    TooLong,

    #[error("namespace cannot start or end with a hyphen")]
    EdgeHyphen,

    #[error("namespace must be lowercase")]
    NotLowercase,

    #[error("invalid character in namespace: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(value: &str) -> Result<Self, NamespaceError> {
        if value.is_empty() {
            return Err(NamespaceError::Empty);
        }

        if value.len() > 63 {
            return Err(NamespaceError::TooLong);
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(NamespaceError::EdgeHyphen);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(NamespaceError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(NamespaceError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Namespace::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dns_labels() {
        assert_eq!(Namespace::new("team-a").unwrap().as_str(), "team-a");
        assert!(Namespace::new("ns1").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Namespace::new(""), Err(NamespaceError::Empty));
    }

    #[test]
    fn rejects_invalid_labels() {
        assert_eq!(Namespace::new("-ns"), Err(NamespaceError::EdgeHyphen));
        assert_eq!(Namespace::new("Prod"), Err(NamespaceError::NotLowercase));
        assert_eq!(Namespace::new("a_b"), Err(NamespaceError::InvalidChar('_')));
        assert_eq!(Namespace::new(&"a".repeat(64)), Err(NamespaceError::TooLong));
    }
}

//! Validated collection identifiers.
//!
//! Collection names end up interpolated into query text, so they are never
//! accepted as raw strings. `CollectionName` enforces the allow-pattern at
//! construction time -- typically once, when configuration is loaded -- and
//! every store operation takes the validated type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MemoryError;

/// A validated collection (table) identifier.
///
/// Permits one or two segments separated by a single `.` (an optional
/// schema qualifier). Each segment must start with a letter or underscore
/// and contain only `[A-Za-z0-9_]`. Anything else is rejected with
/// [`MemoryError::InvalidIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    /// Validate and construct a collection name.
    pub fn new(name: &str) -> Result<Self, MemoryError> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.is_empty() || parts.len() > 2 {
            return Err(MemoryError::InvalidIdentifier(name.to_string()));
        }
        for part in &parts {
            if !segment_is_valid(part) {
                return Err(MemoryError::InvalidIdentifier(name.to_string()));
            }
        }
        Ok(Self(name.to_string()))
    }

    /// The full (possibly schema-qualified) identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unqualified table name (last segment).
    ///
    /// The local store matches this against its fixed allow-list.
    pub fn table(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((_, table)) => table,
            None => &self.0,
        }
    }
}

fn segment_is_valid(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CollectionName {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for CollectionName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CollectionName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CollectionName::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_names() {
        for name in ["memories", "ocr_logs", "_private", "t2", "Memories"] {
            assert!(CollectionName::new(name).is_ok(), "'{name}' should be valid");
        }
    }

    #[test]
    fn test_accepts_one_schema_qualifier() {
        let name = CollectionName::new("archive.memories").unwrap();
        assert_eq!(name.as_str(), "archive.memories");
        assert_eq!(name.table(), "memories");
    }

    #[test]
    fn test_rejects_injection_attempts() {
        for name in [
            "memories; DROP TABLE memories",
            "memories--",
            "a.b.c",
            "",
            ".",
            "mem ories",
            "1memories",
            "memories)",
            "mémoires",
        ] {
            let err = CollectionName::new(name).unwrap_err();
            assert!(
                matches!(err, MemoryError::InvalidIdentifier(_)),
                "'{name}' should be rejected"
            );
        }
    }

    #[test]
    fn test_table_without_qualifier() {
        let name = CollectionName::new("memories").unwrap();
        assert_eq!(name.table(), "memories");
    }

    #[test]
    fn test_serde_roundtrip() {
        let name = CollectionName::new("memories").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"memories\"");
        let parsed: CollectionName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<CollectionName, _> = serde_json::from_str("\"a;b\"");
        assert!(result.is_err());
    }
}

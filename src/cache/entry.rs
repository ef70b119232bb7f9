//! Data model stored in the hash cache.

use serde::{Deserialize, Serialize};

/// A single cached content hash.
///
/// The hash is valid only while the file's current modification time
/// equals `modified`. Serialized field names (`md5`, `mod`) are the
/// on-disk names; cache files written by earlier uploader versions must
/// keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Lowercase fixed-width hex MD5 of the full file content
    pub md5: String,
    /// Modification time (seconds since the Unix epoch) observed when
    /// `md5` was computed
    #[serde(rename = "mod")]
    pub modified: i64,
}

impl CacheEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(md5: String, modified: i64) -> Self {
        Self { md5, modified }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_wire_field_names() {
        let entry = CacheEntry::new("abc123".to_string(), 1000);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"md5":"abc123","mod":1000}"#);
    }

    #[test]
    fn test_deserializes_legacy_shape() {
        let entry: CacheEntry = serde_json::from_str(r#"{"md5": "abc123", "mod": 1000}"#).unwrap();
        assert_eq!(entry.md5, "abc123");
        assert_eq!(entry.modified, 1000);
    }
}

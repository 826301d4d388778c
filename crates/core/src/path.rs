//! Path parsing
//!
//! Paths name a bucket, an object, or both, using the `bucket:key` convention:
//! - `bucket:key` names an object in a bucket
//! - `bucket:` or `bucket` names a bucket
//! - `:key` names an object in the default bucket

use std::str::FromStr;

use crate::error::{Error, Result};

/// A parsed `bucket:key` reference. Either side may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    /// Bucket name
    pub bucket: Option<String>,
    /// Object key
    pub key: Option<String>,
}

impl ObjectPath {
    /// Create a new ObjectPath
    pub fn new(bucket: Option<&str>, key: Option<&str>) -> Self {
        Self {
            bucket: bucket.map(str::to_string),
            key: key.map(str::to_string),
        }
    }

    /// Path naming an object in a bucket
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            key: Some(key.into()),
        }
    }

    /// Path naming only a bucket
    pub fn bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            key: None,
        }
    }

    /// Locate a single object, falling back to `default_bucket`.
    ///
    /// A bare name with no key is treated as a key in the default bucket,
    /// and `:key` uses the default bucket. Returns `None` when no bucket
    /// can be determined.
    pub fn locate_object(&self, default_bucket: Option<&str>) -> Option<(String, String)> {
        match (self.bucket.as_deref(), self.key.as_deref()) {
            (Some(bucket), Some(key)) => Some((bucket.to_string(), key.to_string())),
            (Some(name), None) => default_bucket.map(|b| (b.to_string(), name.to_string())),
            (None, Some(key)) => default_bucket.map(|b| (b.to_string(), key.to_string())),
            (None, None) => None,
        }
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            self.bucket.as_deref().unwrap_or_default(),
            self.key.as_deref().unwrap_or_default()
        )
    }
}

impl FromStr for ObjectPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_path(s)
    }
}

/// Parse a `bucket:key` string into an ObjectPath
///
/// Only the first colon separates bucket from key, so keys may contain
/// colons. Empty sides become `None`.
pub fn parse_path(path: &str) -> Result<ObjectPath> {
    let (bucket, key) = match path.split_once(':') {
        Some((bucket, key)) => (bucket, key),
        None => (path, ""),
    };

    let bucket = (!bucket.is_empty()).then_some(bucket);
    let key = (!key.is_empty()).then_some(key);

    if bucket.is_none() && key.is_none() {
        return Err(Error::InvalidPath(format!(
            "'{path}' names neither a bucket nor a key. Use format: bucket[:key]"
        )));
    }

    Ok(ObjectPath::new(bucket, key))
}

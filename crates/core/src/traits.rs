//! ObjectStore trait definition
//!
//! This trait defines the interface for S3-compatible storage operations.
//! It allows the CLI to be decoupled from the specific S3 SDK implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::acl::{Acl, CannedAcl};
use crate::error::Result;

/// Metadata for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    /// Bucket name
    pub name: String,

    /// Creation timestamp, when the backend reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created: None,
        }
    }
}

/// Metadata for an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Bucket holding the object
    pub bucket: String,

    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag without surrounding quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// User-defined metadata (`x-amz-meta-*`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo with no metadata
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size_bytes: None,
            size_human: None,
            last_modified: None,
            etag: None,
            content_type: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a new ObjectInfo for an object of known size
    pub fn file(bucket: impl Into<String>, key: impl Into<String>, size: i64) -> Self {
        let mut info = Self::new(bucket, key);
        info.set_size(size);
        info
    }

    /// Set the size and its human-readable form
    pub fn set_size(&mut self, size: i64) {
        self.size_bytes = Some(size);
        self.size_human = Some(humansize::format_size(
            size.max(0) as u64,
            humansize::BINARY,
        ));
    }
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
/// Lookups return `Ok(None)` when the bucket or object does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Look up a bucket by name
    async fn lookup_bucket(&self, bucket: &str) -> Result<Option<BucketInfo>>;

    /// List every object in a bucket, following pagination
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>>;

    /// Get object metadata, including user metadata
    async fn head_object(&self, bucket: &str, key: &str) -> Result<Option<ObjectInfo>>;

    /// Create a bucket, optionally with a canned ACL
    async fn create_bucket(&self, bucket: &str, acl: Option<CannedAcl>) -> Result<()>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Upload object content
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Get object content as bytes
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Apply a canned ACL to a bucket
    async fn set_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()>;

    /// Apply a canned ACL to an object
    async fn set_object_acl(&self, bucket: &str, key: &str, acl: CannedAcl) -> Result<()>;

    /// Fetch the full access control policy of an object
    async fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Acl>;
}

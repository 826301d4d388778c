//! bkt-core: Core library for the bkt object storage CLI
//!
//! This crate provides the core functionality for bkt, including:
//! - Configuration and connection profiles
//! - `bucket:key` path parsing
//! - Target resolution for commands that act on buckets and objects
//! - Canned ACLs and ACL summaries
//! - ObjectStore trait for S3 operations
//!
//! This crate is independent of any specific S3 SDK so that the
//! resolution logic can be tested against a mocked store.

pub mod acl;
pub mod config;
pub mod error;
pub mod path;
pub mod profile;
pub mod target;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use acl::{Acl, CannedAcl, Grant, Grantee, Owner, summarize_acl};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use path::{ObjectPath, parse_path};
pub use profile::{DEFAULT_PROFILE, Profile, ProfileManager};
pub use target::{ResolveOptions, Target, find_bucket, find_object, resolve_targets};
pub use traits::{BucketInfo, ObjectInfo, ObjectStore};

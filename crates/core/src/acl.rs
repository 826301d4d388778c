//! Access control lists
//!
//! Canned ACL names accepted on the command line, plus an SDK-independent
//! model of a full access control policy and its display summary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A predefined access control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CannedAcl {
    /// Owner gets FULL_CONTROL, nobody else has access
    Private,
    /// Owner gets FULL_CONTROL, everyone can read
    PublicRead,
    /// Owner gets FULL_CONTROL, everyone can read and write
    PublicReadWrite,
    /// Owner gets FULL_CONTROL, authenticated users can read
    AuthenticatedRead,
}

impl CannedAcl {
    /// All canned ACLs, in the order they are listed in help output
    pub const ALL: [CannedAcl; 4] = [
        CannedAcl::Private,
        CannedAcl::PublicRead,
        CannedAcl::PublicReadWrite,
        CannedAcl::AuthenticatedRead,
    ];

    /// The wire name of this ACL, as used in the `x-amz-acl` header
    pub const fn as_str(self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
        }
    }
}

impl FromStr for CannedAcl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        CannedAcl::ALL
            .into_iter()
            .find(|acl| acl.as_str() == normalized)
            .ok_or_else(|| {
                Error::InvalidAcl(format!(
                    "'{s}'. Valid values: private, public-read, public-read-write, authenticated-read"
                ))
            })
    }
}

impl std::fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of a bucket or object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Canonical user ID
    pub id: String,
    /// Display name, if the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// The party a grant applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Grantee {
    /// A user identified by canonical ID
    CanonicalUser {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    /// A predefined group such as AllUsers
    Group { uri: String },
    /// A user identified by e-mail address
    Email { address: String },
}

impl Grantee {
    /// Short label used when displaying the grantee
    pub fn label(&self) -> String {
        match self {
            Grantee::CanonicalUser { id, display_name } => display_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or(id.as_str())
                .to_string(),
            Grantee::Group { uri } => uri
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(uri.as_str())
                .to_string(),
            Grantee::Email { address } => address.clone(),
        }
    }
}

/// A single permission granted to a grantee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub grantee: Grantee,
    /// Permission name, e.g. `READ` or `FULL_CONTROL`
    pub permission: String,
}

impl Grant {
    pub fn new(grantee: Grantee, permission: impl Into<String>) -> Self {
        Self {
            grantee,
            permission: permission.into(),
        }
    }
}

/// Access control policy of a bucket or object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub grants: Vec<Grant>,
}

/// Summarize an ACL as `(entity, permissions)` pairs for display.
///
/// One entry per distinct grantee label, in order of first appearance.
/// Permissions are joined with `", "` and repeated permissions are dropped.
pub fn summarize_acl(acl: &Acl) -> Vec<(String, String)> {
    let mut entries: Vec<(String, Vec<&str>)> = Vec::new();

    for grant in &acl.grants {
        let label = grant.grantee.label();
        let position = match entries.iter().position(|(entity, _)| *entity == label) {
            Some(position) => position,
            None => {
                entries.push((label, Vec::new()));
                entries.len() - 1
            }
        };

        let permissions = &mut entries[position].1;
        if !permissions.contains(&grant.permission.as_str()) {
            permissions.push(grant.permission.as_str());
        }
    }

    entries
        .into_iter()
        .map(|(entity, permissions)| (entity, permissions.join(", ")))
        .collect()
}

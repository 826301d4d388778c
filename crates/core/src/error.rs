//! Error types for bkt-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for bkt-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bkt-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Unknown canned ACL name
    #[error("Invalid canned ACL: {0}")]
    InvalidAcl(String),

    /// Profile settings rejected by validation
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication or permission failure
    #[error("Access denied: {0}")]
    Auth(String),

    /// Bucket or object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or service error
    #[error("Network error: {0}")]
    Network(String),

    /// Conflict error, e.g. a non-empty bucket
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_)
            | Error::InvalidAcl(_)
            | Error::InvalidProfile(_)
            | Error::InvalidUrl(_) => 2, // UsageError
            _ => 1,                      // GeneralError
        }
    }
}

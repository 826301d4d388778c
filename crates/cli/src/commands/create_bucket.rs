//! create-bucket command
//!
//! Creates a new bucket, optionally with a canned ACL.

use bkt_core::CannedAcl;
use clap::{ArgGroup, Args};
use serde::Serialize;
use tracing::info;

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create a new bucket
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("acl").args(["private", "public_read", "public_read_write"])))]
pub struct CreateBucketArgs {
    /// Name of the bucket
    pub name: String,

    /// Make the bucket private
    #[arg(long)]
    pub private: bool,

    /// Make the bucket readable by anyone
    #[arg(long)]
    pub public_read: bool,

    /// Make the bucket readable and writable by anyone
    #[arg(long)]
    pub public_read_write: bool,
}

impl CreateBucketArgs {
    /// Canned ACL selected by the flags, if any
    pub fn acl(&self) -> Option<CannedAcl> {
        if self.private {
            Some(CannedAcl::Private)
        } else if self.public_read {
            Some(CannedAcl::PublicRead)
        } else if self.public_read_write {
            Some(CannedAcl::PublicReadWrite)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateBucketOutput {
    status: &'static str,
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    acl: Option<CannedAcl>,
}

/// Execute the create-bucket command
pub async fn execute(args: CreateBucketArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    if let Err(e) = validate_bucket_name(&args.name) {
        formatter.error(&e);
        return ExitCode::UsageError;
    }

    let acl = args.acl();
    match acl {
        Some(acl) => info!("creating bucket {} with '{acl}'", args.name),
        None => info!("creating bucket {}", args.name),
    }

    match session.store().create_bucket(&args.name, acl).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&CreateBucketOutput {
                    status: "success",
                    bucket: args.name,
                    acl,
                });
            } else {
                formatter.success(&format!("Bucket '{}' created successfully.", args.name));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to create bucket '{}': {e}", args.name));
            ExitCode::GeneralError
        }
    }
}

fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Bucket name cannot be empty".to_string());
    }

    if name.contains(':') {
        return Err(format!("Bucket name '{name}' cannot contain ':'"));
    }

    if name.len() < 3 || name.len() > 63 {
        return Err("Bucket name must be between 3 and 63 characters".to_string());
    }

    Ok(())
}

//! delete-objects command
//!
//! Deletes individual objects. A bare name, or `:key`, refers to a key in
//! the default bucket.

use bkt_core::{ObjectPath, find_bucket, find_object};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete existing objects
#[derive(Args, Debug)]
pub struct DeleteObjectsArgs {
    /// Objects to delete (bucket:key, :key, or key)
    #[arg(required = true)]
    pub objects: Vec<ObjectPath>,

    /// Bucket to use for paths that do not name one
    #[arg(short, long)]
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteObjectsOutput {
    deleted: Vec<String>,
}

/// Execute the delete-objects command
pub async fn execute(args: DeleteObjectsArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let store = session.store();
    let default_bucket = session.default_bucket(args.bucket.as_deref());
    let mut deleted = Vec::new();

    for path in &args.objects {
        let Some((bucket, key)) = path.locate_object(default_bucket.as_deref()) else {
            warn!("no bucket given for {path}. skipping");
            continue;
        };

        if find_bucket(store, &bucket).await.is_none() {
            warn!("could not find bucket {bucket}");
            continue;
        }
        if find_object(store, &bucket, &key).await.is_none() {
            continue;
        }

        info!("deleting {bucket}:{key}");
        match store.delete_object(&bucket, &key).await {
            Ok(()) => {
                formatter.success(&format!("Deleted {bucket}:{key}"));
                deleted.push(format!("{bucket}:{key}"));
            }
            Err(e) => warn!("could not delete {bucket}:{key}: {e}"),
        }
    }

    if formatter.is_json() {
        formatter.json(&DeleteObjectsOutput { deleted });
    }

    ExitCode::Success
}

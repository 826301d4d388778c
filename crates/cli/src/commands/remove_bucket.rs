//! remove-bucket command
//!
//! Deletes a bucket. A non-empty bucket is only removed with `--force`,
//! which deletes every object first.

use bkt_core::find_bucket;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete an existing bucket
#[derive(Args, Debug)]
pub struct RemoveBucketArgs {
    /// Name of the bucket to remove
    pub bucket: String,

    /// Delete all objects in the bucket first
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RemoveBucketOutput {
    bucket: String,
    removed: bool,
    objects_deleted: usize,
}

/// Execute the remove-bucket command
pub async fn execute(args: RemoveBucketArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let store = session.store();
    let name = &args.bucket;
    let mut output = RemoveBucketOutput {
        bucket: name.clone(),
        removed: false,
        objects_deleted: 0,
    };

    if find_bucket(store, name).await.is_none() {
        warn!("could not load bucket {name}");
    } else {
        if args.force {
            output.objects_deleted = empty_bucket(session, name).await;
        }

        info!("removing bucket {name}");
        match store.delete_bucket(name).await {
            Ok(()) => {
                formatter.success(&format!("Removed bucket '{name}'."));
                output.removed = true;
            }
            Err(e) if args.force => warn!("could not remove bucket {name}: {e}"),
            Err(e) => warn!("could not remove bucket {name}; try --force: {e}"),
        }
    }

    if formatter.is_json() {
        formatter.json(&output);
    }

    ExitCode::Success
}

/// Delete every object in a bucket, returning how many were removed
async fn empty_bucket(session: &Session, bucket: &str) -> usize {
    let store = session.store();
    let objects = match store.list_objects(bucket).await {
        Ok(objects) => objects,
        Err(e) => {
            warn!("could not list bucket {bucket}: {e}");
            return 0;
        }
    };

    let mut deleted = 0;
    for object in objects {
        info!("deleting {bucket}:{}", object.key);
        match store.delete_object(bucket, &object.key).await {
            Ok(()) => deleted += 1,
            Err(e) => warn!("could not delete {bucket}:{}: {e}", object.key),
        }
    }
    deleted
}

//! upload-file command
//!
//! Uploads a local file to `bucket:key`. The key defaults to the file name.

use std::path::{Path, PathBuf};

use bkt_core::{ObjectPath, find_bucket};
use clap::Args;
use tracing::{error, info, warn};

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Upload a local file to an object
#[derive(Args, Debug)]
pub struct UploadFileArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Destination (bucket:key, bucket, or :key)
    pub destination: ObjectPath,

    /// Replace the object if it already exists
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the upload-file command
pub async fn execute(args: UploadFileArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let store = session.store();

    let Some(bucket) = args
        .destination
        .bucket
        .clone()
        .or_else(|| session.default_bucket(None))
    else {
        formatter.error(&format!("No bucket given for {}", args.destination));
        return ExitCode::UsageError;
    };

    let Some(key) = destination_key(&args.destination, &args.source) else {
        formatter.error(&format!(
            "Cannot derive a key from '{}'",
            args.source.display()
        ));
        return ExitCode::UsageError;
    };

    if find_bucket(store, &bucket).await.is_none() {
        error!("could not find bucket {bucket}");
        return ExitCode::Success;
    }

    if !args.force {
        match store.head_object(&bucket, &key).await {
            Ok(Some(_)) => {
                warn!("{bucket}:{key} already exists; use --force to replace it");
                return ExitCode::Success;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "could not check whether {bucket}:{key} exists: {e}; skipping, use --force to upload anyway"
                );
                return ExitCode::Success;
            }
        }
    }

    let data = match tokio::fs::read(&args.source).await {
        Ok(data) => data,
        Err(e) => {
            formatter.error(&format!("Failed to read {}: {e}", args.source.display()));
            return ExitCode::GeneralError;
        }
    };

    let content_type = mime_guess::from_path(&args.source)
        .first()
        .map(|mime| mime.to_string());

    info!(
        "uploading {} to {bucket}:{key} ({} bytes)",
        args.source.display(),
        data.len()
    );
    let spinner = ProgressBar::spinner(formatter.config(), &format!("Uploading {bucket}:{key}"));
    let result = store.put_object(&bucket, &key, data, content_type).await;
    spinner.finish_and_clear();

    match result {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&info);
            } else {
                formatter.success(&format!(
                    "Uploaded {} to {bucket}:{key}",
                    args.source.display()
                ));
            }
        }
        Err(e) => error!("could not upload {} to {bucket}:{key}: {e}", args.source.display()),
    }

    ExitCode::Success
}

/// Key to upload to: the path's key, or the source file name
fn destination_key(destination: &ObjectPath, source: &Path) -> Option<String> {
    destination.key.clone().or_else(|| {
        source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    })
}

//! download-object command
//!
//! Downloads an object to a local file.

use std::path::PathBuf;

use bkt_core::{ObjectPath, find_bucket};
use clap::Args;
use serde::Serialize;
use tracing::{error, info, warn};

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Download an object to a local file
#[derive(Args, Debug)]
pub struct DownloadObjectArgs {
    /// Object to download (bucket:key, :key, or key)
    pub source: ObjectPath,

    /// Local file to write
    pub destination: PathBuf,

    /// Overwrite the destination if it already exists
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct DownloadOutput {
    source: String,
    destination: String,
    size_bytes: usize,
}

/// Execute the download-object command
pub async fn execute(args: DownloadObjectArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let store = session.store();

    if !args.force && args.destination.exists() {
        warn!(
            "{} already exists; use --force to overwrite it",
            args.destination.display()
        );
        return ExitCode::Success;
    }

    let Some((bucket, key)) = args.source.locate_object(session.default_bucket(None).as_deref())
    else {
        formatter.error(&format!("No bucket given for {}", args.source));
        return ExitCode::UsageError;
    };

    if find_bucket(store, &bucket).await.is_none() {
        error!("could not find bucket {bucket}");
        return ExitCode::Success;
    }
    match store.head_object(&bucket, &key).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            error!("could not find key {bucket}:{key}");
            return ExitCode::Success;
        }
        Err(e) => {
            error!("could not look up key {bucket}:{key}: {e}");
            return ExitCode::Success;
        }
    }

    info!("downloading {bucket}:{key} to {}", args.destination.display());
    let spinner = ProgressBar::spinner(formatter.config(), &format!("Downloading {bucket}:{key}"));
    let result = store.get_object(&bucket, &key).await;
    spinner.finish_and_clear();

    let data = match result {
        Ok(data) => data,
        Err(e) => {
            error!("could not download {bucket}:{key}: {e}");
            return ExitCode::Success;
        }
    };

    if let Some(parent) = args.destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            formatter.error(&format!("Failed to create {}: {e}", parent.display()));
            return ExitCode::GeneralError;
        }
    }

    if let Err(e) = tokio::fs::write(&args.destination, &data).await {
        formatter.error(&format!(
            "Failed to write {}: {e}",
            args.destination.display()
        ));
        return ExitCode::GeneralError;
    }

    if formatter.is_json() {
        formatter.json(&DownloadOutput {
            source: format!("{bucket}:{key}"),
            destination: args.destination.display().to_string(),
            size_bytes: data.len(),
        });
    } else {
        formatter.success(&format!(
            "Downloaded {bucket}:{key} to {}",
            args.destination.display()
        ));
    }

    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{LogCapture, MockStore, quiet_formatter};
    use bkt_core::{Error, ObjectInfo};
    use tempfile::TempDir;

    fn store_with_object() -> MockStore {
        let mut store = MockStore::with_buckets(&["photos"]);
        store.expect_head_object().returning(|bucket, key| {
            Ok((key == "cat.jpg").then(|| ObjectInfo::file(bucket, key, 4)))
        });
        store
    }

    #[tokio::test]
    async fn test_download_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("nested/out/cat.jpg");

        let mut store = store_with_object();
        store
            .expect_get_object()
            .withf(|bucket, key| bucket == "photos" && key == "cat.jpg")
            .times(1)
            .returning(|_, _| Ok(b"meow".to_vec()));

        let args = DownloadObjectArgs {
            source: ObjectPath::object("photos", "cat.jpg"),
            destination: destination.clone(),
            force: false,
        };
        let code = execute(args, &store.into_session(None), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
        assert_eq!(std::fs::read(&destination).unwrap(), b"meow");
    }

    #[tokio::test]
    async fn test_existing_destination_is_kept() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("cat.jpg");
        std::fs::write(&destination, b"original").unwrap();

        let mut store = MockStore::new();
        store.expect_lookup_bucket().never();
        store.expect_get_object().never();

        let args = DownloadObjectArgs {
            source: ObjectPath::object("photos", "cat.jpg"),
            destination: destination.clone(),
            force: false,
        };
        let code = execute(args, &store.into_session(None), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
        assert_eq!(std::fs::read(&destination).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_force_overwrites_destination() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("cat.jpg");
        std::fs::write(&destination, b"original").unwrap();

        let mut store = store_with_object();
        store
            .expect_get_object()
            .times(1)
            .returning(|_, _| Ok(b"meow".to_vec()));

        let args = DownloadObjectArgs {
            source: ObjectPath::new(None, Some("cat.jpg")),
            destination: destination.clone(),
            force: true,
        };
        let code = execute(args, &store.into_session(Some("photos")), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
        assert_eq!(std::fs::read(&destination).unwrap(), b"meow");
    }

    #[tokio::test]
    async fn test_missing_key_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("dog.jpg");

        let mut store = store_with_object();
        store.expect_get_object().never();
        let (logs, _guard) = LogCapture::install();

        let args = DownloadObjectArgs {
            source: ObjectPath::object("photos", "dog.jpg"),
            destination: destination.clone(),
            force: false,
        };
        let code = execute(args, &store.into_session(None), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
        assert!(!destination.exists());
        let logs = logs.contents();
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("could not find key photos:dog.jpg"), "{logs}");
    }

    #[tokio::test]
    async fn test_get_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("cat.jpg");

        let mut store = store_with_object();
        store
            .expect_get_object()
            .returning(|_, _| Err(Error::Network("connection reset".into())));

        let args = DownloadObjectArgs {
            source: ObjectPath::object("photos", "cat.jpg"),
            destination: destination.clone(),
            force: false,
        };
        let code = execute(args, &store.into_session(None), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
        assert!(!destination.exists());
    }
}

//! show-object command
//!
//! Displays object metadata, its ACL summary and user metadata.

use std::collections::BTreeMap;

use bkt_core::{Acl, ObjectInfo, ObjectPath, find_bucket, find_object, summarize_acl};
use clap::Args;
use serde::Serialize;
use tracing::{error, warn};

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Show information about an object
#[derive(Args, Debug)]
pub struct ShowObjectArgs {
    /// Object to show (bucket:key, :key, or key)
    pub object: ObjectPath,

    /// Bucket to use when the path does not name one
    #[arg(short, long)]
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize)]
struct AclEntry {
    entity: String,
    permissions: String,
}

#[derive(Debug, Serialize)]
struct ShowObjectOutput {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
    acls: Vec<AclEntry>,
    metadata: BTreeMap<String, String>,
}

/// Execute the show-object command
pub async fn execute(args: ShowObjectArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let store = session.store();
    let default_bucket = session.default_bucket(args.bucket.as_deref());

    let Some((bucket, key)) = args.object.locate_object(default_bucket.as_deref()) else {
        formatter.error(&format!("No bucket given for {}", args.object));
        return ExitCode::UsageError;
    };

    if find_bucket(store, &bucket).await.is_none() {
        error!("could not find bucket {bucket}");
        return ExitCode::Success;
    }
    let Some(info) = find_object(store, &bucket, &key).await else {
        return ExitCode::Success;
    };

    let acl = match store.get_object_acl(&bucket, &key).await {
        Ok(acl) => acl,
        Err(e) => {
            warn!("could not read ACL of {bucket}:{key}: {e}");
            Acl::default()
        }
    };
    let acl_summary = summarize_acl(&acl);

    if formatter.is_json() {
        formatter.json(&ShowObjectOutput {
            name: info.key.clone(),
            size_bytes: info.size_bytes,
            size_human: info.size_human.clone(),
            last_modified: info.last_modified.map(|t| t.to_string()),
            content_type: info.content_type.clone(),
            etag: info.etag.clone(),
            acls: acl_summary
                .into_iter()
                .map(|(entity, permissions)| AclEntry {
                    entity,
                    permissions,
                })
                .collect(),
            metadata: info.metadata,
        });
    } else {
        formatter.table(["Field", "Value"], object_rows(&info, &acl_summary));
    }

    ExitCode::Success
}

/// Two-column rows describing an object.
///
/// ACL entries and user metadata follow their section rows, indented by two spaces.
fn object_rows(info: &ObjectInfo, acl_summary: &[(String, String)]) -> Vec<(String, String)> {
    let mut rows = vec![
        ("Name".to_string(), info.key.clone()),
        ("Size".to_string(), format_size(info)),
        (
            "Last Modified".to_string(),
            info.last_modified
                .map(|t| t.strftime("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_default(),
        ),
        (
            "Content Type".to_string(),
            info.content_type.clone().unwrap_or_default(),
        ),
        ("ETag".to_string(), info.etag.clone().unwrap_or_default()),
        ("ACLs".to_string(), String::new()),
    ];

    rows.extend(
        acl_summary
            .iter()
            .map(|(entity, permissions)| (format!("  {entity}"), permissions.clone())),
    );

    if !info.metadata.is_empty() {
        rows.push(("Metadata".to_string(), String::new()));
        rows.extend(
            info.metadata
                .iter()
                .map(|(name, value)| (format!("  {name}"), value.clone())),
        );
    }

    rows
}

fn format_size(info: &ObjectInfo) -> String {
    match (info.size_bytes, &info.size_human) {
        (Some(bytes), Some(human)) => format!("{bytes} ({human})"),
        (Some(bytes), None) => bytes.to_string(),
        _ => String::new(),
    }
}

//! set-canned-acl command
//!
//! Applies a canned ACL to every bucket and object the given paths resolve to.

use bkt_core::{CannedAcl, ObjectPath, ResolveOptions, resolve_targets};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use super::Session;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Change a bucket or object's ACL to the specified canned value
#[derive(Args, Debug)]
pub struct SetCannedAclArgs {
    /// Canned ACL: private, public-read, public-read-write, authenticated-read
    pub policy: CannedAcl,

    /// Buckets or objects (bucket, bucket:key, or :key)
    #[arg(required = true)]
    pub targets: Vec<ObjectPath>,

    /// Also apply to every object in named buckets
    #[arg(short, long)]
    pub recursive: bool,

    /// Bucket to use for paths that do not name one
    #[arg(short, long)]
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize)]
struct AclChange {
    target: String,
    kind: &'static str,
    acl: CannedAcl,
}

/// Execute the set-canned-acl command
pub async fn execute(args: SetCannedAclArgs, session: &Session, formatter: &Formatter) -> ExitCode {
    let options = ResolveOptions {
        default_bucket: session.default_bucket(args.bucket.as_deref()),
        recursive: args.recursive,
    };

    let mut changed = Vec::new();
    for path in &args.targets {
        for target in resolve_targets(session.store(), path, &options).await {
            info!("setting '{}' on {} ({})", args.policy, target.name(), target.kind());
            match target.set_canned_acl(session.store(), args.policy).await {
                Ok(()) => {
                    formatter.success(&format!("Set '{}' on {}", args.policy, target.name()));
                    changed.push(AclChange {
                        target: target.name(),
                        kind: target.kind(),
                        acl: args.policy,
                    });
                }
                Err(e) => warn!("could not set '{}' on {}: {e}", args.policy, target.name()),
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&changed);
    }

    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{MockStore, quiet_formatter};
    use bkt_core::{Error, ObjectInfo};

    fn args(policy: CannedAcl, targets: &[&str], recursive: bool) -> SetCannedAclArgs {
        SetCannedAclArgs {
            policy,
            targets: targets.iter().map(|t| t.parse().unwrap()).collect(),
            recursive,
            bucket: None,
        }
    }

    #[tokio::test]
    async fn test_sets_acl_on_bucket() {
        let mut store = MockStore::with_buckets(&["photos"]);
        store
            .expect_set_bucket_acl()
            .withf(|bucket, acl| bucket == "photos" && *acl == CannedAcl::PublicRead)
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_set_object_acl().never();

        let code = execute(
            args(CannedAcl::PublicRead, &["photos"], false),
            &store.into_session(None),
            &quiet_formatter(),
        )
        .await;

        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_recursive_sets_objects_then_bucket() {
        let mut store = MockStore::with_buckets(&["photos"]);
        store.expect_list_objects().returning(|bucket| {
            Ok(vec![
                ObjectInfo::new(bucket, "a.jpg"),
                ObjectInfo::new(bucket, "b.jpg"),
            ])
        });
        store
            .expect_set_object_acl()
            .withf(|bucket, _, acl| bucket == "photos" && *acl == CannedAcl::Private)
            .times(2)
            .returning(|_, _, _| Ok(()));
        store
            .expect_set_bucket_acl()
            .times(1)
            .returning(|_, _| Ok(()));

        let code = execute(
            args(CannedAcl::Private, &["photos"], true),
            &store.into_session(None),
            &quiet_formatter(),
        )
        .await;

        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_failure_on_one_target_continues() {
        let mut store = MockStore::with_buckets(&["photos", "music"]);
        store
            .expect_set_bucket_acl()
            .withf(|bucket, _| bucket == "photos")
            .times(1)
            .returning(|_, _| Err(Error::Auth("AccessDenied".into())));
        store
            .expect_set_bucket_acl()
            .withf(|bucket, _| bucket == "music")
            .times(1)
            .returning(|_, _| Ok(()));

        let code = execute(
            args(CannedAcl::PublicRead, &["photos", "music"], false),
            &store.into_session(None),
            &quiet_formatter(),
        )
        .await;

        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_key_uses_bucket_flag() {
        let mut store = MockStore::with_buckets(&["photos"]);
        store
            .expect_head_object()
            .withf(|bucket, key| bucket == "photos" && key == "cat.jpg")
            .returning(|bucket, key| Ok(Some(ObjectInfo::new(bucket, key))));
        store
            .expect_set_object_acl()
            .withf(|bucket, key, _| bucket == "photos" && key == "cat.jpg")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut args = args(CannedAcl::AuthenticatedRead, &[":cat.jpg"], false);
        args.bucket = Some("photos".to_string());

        let code = execute(args, &store.into_session(Some("ignored")), &quiet_formatter()).await;

        assert_eq!(code, ExitCode::Success);
    }
}

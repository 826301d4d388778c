//! Target resolution
//!
//! Maps a `bucket[:key]` path plus the `--bucket`/`--recursive` flags onto the
//! concrete buckets and objects a command should act on. Nothing here returns
//! an error: anything that cannot be resolved is logged and skipped so the
//! remaining paths of a batch are still processed.

use tracing::{debug, warn};

use crate::acl::CannedAcl;
use crate::error::Result;
use crate::path::ObjectPath;
use crate::traits::{BucketInfo, ObjectInfo, ObjectStore};

/// A bucket or object that a command acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Bucket(BucketInfo),
    Object(ObjectInfo),
}

impl Target {
    /// Display name in `bucket:key` form
    pub fn name(&self) -> String {
        match self {
            Target::Bucket(bucket) => format!("{}:", bucket.name),
            Target::Object(object) => format!("{}:{}", object.bucket, object.key),
        }
    }

    /// "bucket" or "object"
    pub const fn kind(&self) -> &'static str {
        match self {
            Target::Bucket(_) => "bucket",
            Target::Object(_) => "object",
        }
    }

    /// Apply a canned ACL to this target
    pub async fn set_canned_acl(&self, store: &dyn ObjectStore, acl: CannedAcl) -> Result<()> {
        match self {
            Target::Bucket(bucket) => store.set_bucket_acl(&bucket.name, acl).await,
            Target::Object(object) => {
                store
                    .set_object_acl(&object.bucket, &object.key, acl)
                    .await
            }
        }
    }
}

/// Flags that influence target resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Bucket to look in when a path does not name one
    pub default_bucket: Option<String>,
    /// Include every object of a named bucket, ahead of the bucket itself
    pub recursive: bool,
}

/// Resolve a path into the ordered list of targets to act on.
///
/// - `bucket:key` (or `:key` with a default bucket) yields that single object.
/// - A name that resolves to a bucket yields the bucket, preceded by all of
///   its objects when `recursive` is set.
/// - A name that is not a bucket is looked up as a key in the default bucket.
///
/// Returns an empty list, after logging a warning, when nothing resolves.
pub async fn resolve_targets(
    store: &dyn ObjectStore,
    path: &ObjectPath,
    options: &ResolveOptions,
) -> Vec<Target> {
    let bucket_name = path
        .bucket
        .as_deref()
        .or(options.default_bucket.as_deref());

    if let Some(key) = path.key.as_deref() {
        let Some(bucket_name) = bucket_name else {
            warn!("no bucket to look for {key} in");
            return Vec::new();
        };
        return match find_bucket(store, bucket_name).await {
            Some(_) => find_object(store, bucket_name, key)
                .await
                .map(Target::Object)
                .into_iter()
                .collect(),
            None => {
                warn!("could not find bucket {bucket_name}");
                Vec::new()
            }
        };
    }

    let Some(bucket_name) = bucket_name else {
        warn!("nothing to resolve in path {path}");
        return Vec::new();
    };

    if let Some(bucket) = find_bucket(store, bucket_name).await {
        let mut targets = Vec::new();
        if options.recursive {
            debug!("yielding contents of bucket {bucket_name}");
            match store.list_objects(bucket_name).await {
                Ok(objects) => targets.extend(objects.into_iter().map(Target::Object)),
                Err(e) => {
                    warn!("could not list bucket {bucket_name}: {e}");
                    return Vec::new();
                }
            }
        }
        targets.push(Target::Bucket(bucket));
        return targets;
    }

    // Not a bucket; maybe a key in the default bucket.
    match options.default_bucket.as_deref() {
        Some(default_bucket) => {
            if find_bucket(store, default_bucket).await.is_none() {
                warn!("could not find bucket {default_bucket}");
                return Vec::new();
            }
            match find_object(store, default_bucket, bucket_name).await {
                Some(object) => vec![Target::Object(object)],
                None => {
                    warn!("{bucket_name} is not a key in bucket {default_bucket}. skipping");
                    Vec::new()
                }
            }
        }
        None => {
            warn!("could not find bucket {bucket_name}");
            Vec::new()
        }
    }
}

/// Look up a bucket, logging storage errors as warnings
pub async fn find_bucket(store: &dyn ObjectStore, bucket: &str) -> Option<BucketInfo> {
    debug!("looking up bucket {bucket}");
    match store.lookup_bucket(bucket).await {
        Ok(found) => found,
        Err(e) => {
            warn!("could not look up bucket {bucket}: {e}");
            None
        }
    }
}

/// Look up an object, logging a warning when it is missing
pub async fn find_object(store: &dyn ObjectStore, bucket: &str, key: &str) -> Option<ObjectInfo> {
    debug!("looking up key {key} in bucket {bucket}");
    match store.head_object(bucket, key).await {
        Ok(Some(object)) => Some(object),
        Ok(None) => {
            warn!("could not find key {bucket}:{key}");
            None
        }
        Err(e) => {
            warn!("could not look up key {bucket}:{key}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::LogCapture;
    use crate::traits::MockObjectStore;

    fn store_with_buckets(buckets: &'static [&'static str]) -> MockObjectStore {
        let mut store = MockObjectStore::new();
        store
            .expect_lookup_bucket()
            .returning(move |name| Ok(buckets.contains(&name).then(|| BucketInfo::new(name))));
        store
    }

    fn options(default_bucket: Option<&str>, recursive: bool) -> ResolveOptions {
        ResolveOptions {
            default_bucket: default_bucket.map(str::to_string),
            recursive,
        }
    }

    #[tokio::test]
    async fn test_bucket_without_recursive_yields_bucket() {
        let store = store_with_buckets(&["photos"]);

        let targets =
            resolve_targets(&store, &ObjectPath::bucket("photos"), &options(None, false)).await;

        assert_eq!(targets, vec![Target::Bucket(BucketInfo::new("photos"))]);
    }

    #[tokio::test]
    async fn test_recursive_yields_objects_then_bucket() {
        let mut store = store_with_buckets(&["photos"]);
        store
            .expect_list_objects()
            .withf(|bucket| bucket == "photos")
            .times(1)
            .returning(|bucket| {
                Ok(vec![
                    ObjectInfo::new(bucket, "o1"),
                    ObjectInfo::new(bucket, "o2"),
                ])
            });

        let targets =
            resolve_targets(&store, &ObjectPath::bucket("photos"), &options(None, true)).await;

        let names: Vec<String> = targets.iter().map(Target::name).collect();
        assert_eq!(names, vec!["photos:o1", "photos:o2", "photos:"]);
        assert_eq!(targets[2].kind(), "bucket");
    }

    #[tokio::test]
    async fn test_unknown_bucket_without_default_yields_nothing() {
        let store = store_with_buckets(&[]);
        let (logs, _guard) = LogCapture::install();

        let targets =
            resolve_targets(&store, &ObjectPath::bucket("missing"), &options(None, false)).await;

        assert!(targets.is_empty());
        let logs = logs.contents();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("could not find bucket missing"), "{logs}");
    }

    #[tokio::test]
    async fn test_key_in_named_bucket() {
        let mut store = store_with_buckets(&["photos"]);
        store
            .expect_head_object()
            .withf(|bucket, key| bucket == "photos" && key == "cat.jpg")
            .returning(|bucket, key| Ok(Some(ObjectInfo::file(bucket, key, 10))));

        let targets = resolve_targets(
            &store,
            &ObjectPath::object("photos", "cat.jpg"),
            &options(Some("other"), true),
        )
        .await;

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name(), "photos:cat.jpg");
    }

    #[tokio::test]
    async fn test_key_only_uses_default_bucket() {
        let mut store = store_with_buckets(&["photos"]);
        store
            .expect_head_object()
            .withf(|bucket, key| bucket == "photos" && key == "cat.jpg")
            .returning(|bucket, key| Ok(Some(ObjectInfo::new(bucket, key))));

        let targets = resolve_targets(
            &store,
            &ObjectPath::new(None, Some("cat.jpg")),
            &options(Some("photos"), false),
        )
        .await;

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].kind(), "object");
    }

    #[tokio::test]
    async fn test_key_without_any_bucket_yields_nothing() {
        let mut store = MockObjectStore::new();
        store.expect_lookup_bucket().never();

        let targets = resolve_targets(
            &store,
            &ObjectPath::new(None, Some("cat.jpg")),
            &options(None, false),
        )
        .await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_yields_nothing() {
        let mut store = store_with_buckets(&["photos"]);
        store.expect_head_object().returning(|_, _| Ok(None));

        let targets = resolve_targets(
            &store,
            &ObjectPath::object("photos", "dog.jpg"),
            &options(None, false),
        )
        .await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_key_in_missing_bucket_yields_nothing() {
        let mut store = store_with_buckets(&[]);
        store.expect_head_object().never();

        let targets = resolve_targets(
            &store,
            &ObjectPath::object("missing", "cat.jpg"),
            &options(None, false),
        )
        .await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_bare_name_falls_back_to_key_in_default_bucket() {
        let mut store = store_with_buckets(&["photos"]);
        store
            .expect_head_object()
            .withf(|bucket, key| bucket == "photos" && key == "cat.jpg")
            .returning(|bucket, key| Ok(Some(ObjectInfo::new(bucket, key))));

        let targets = resolve_targets(
            &store,
            &ObjectPath::bucket("cat.jpg"),
            &options(Some("photos"), false),
        )
        .await;

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name(), "photos:cat.jpg");
    }

    #[tokio::test]
    async fn test_bare_name_missing_from_default_bucket() {
        let mut store = store_with_buckets(&["photos"]);
        store.expect_head_object().returning(|_, _| Ok(None));

        let targets = resolve_targets(
            &store,
            &ObjectPath::bucket("dog.jpg"),
            &options(Some("photos"), false),
        )
        .await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_missing_default_bucket_yields_nothing() {
        let mut store = store_with_buckets(&[]);
        store.expect_head_object().never();

        let targets = resolve_targets(
            &store,
            &ObjectPath::bucket("cat.jpg"),
            &options(Some("gone"), false),
        )
        .await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_error_is_skipped() {
        let mut store = MockObjectStore::new();
        store
            .expect_lookup_bucket()
            .returning(|_| Err(Error::Network("connection reset".into())));

        let targets =
            resolve_targets(&store, &ObjectPath::bucket("photos"), &options(None, true)).await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_list_error_is_skipped() {
        let mut store = store_with_buckets(&["photos"]);
        store
            .expect_list_objects()
            .returning(|_| Err(Error::Network("timeout".into())));

        let targets =
            resolve_targets(&store, &ObjectPath::bucket("photos"), &options(None, true)).await;

        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_set_canned_acl_dispatches_by_kind() {
        let mut store = MockObjectStore::new();
        store
            .expect_set_bucket_acl()
            .withf(|bucket, acl| bucket == "photos" && *acl == CannedAcl::PublicRead)
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_set_object_acl()
            .withf(|bucket, key, acl| {
                bucket == "photos" && key == "cat.jpg" && *acl == CannedAcl::Private
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        Target::Bucket(BucketInfo::new("photos"))
            .set_canned_acl(&store, CannedAcl::PublicRead)
            .await
            .unwrap();
        Target::Object(ObjectInfo::new("photos", "cat.jpg"))
            .set_canned_acl(&store, CannedAcl::Private)
            .await
            .unwrap();
    }
}

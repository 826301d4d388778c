//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bkt-core.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, ObjectCannedAcl,
};
use jiff::Timestamp;

use bkt_core::{
    Acl, BucketInfo, CannedAcl, Error, Grant, Grantee, ObjectInfo, ObjectStore, Owner, Profile,
    Result,
};

/// Region in which buckets are created without a location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    profile: Profile,
}

impl S3Client {
    /// Create a new S3 client from a profile
    pub async fn new(profile: Profile) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            profile.access_key.clone(),
            profile.secret_key.clone(),
            None, // session token
            None, // expiry
            "bkt-profile",
        );

        let retry = profile.retry_config();
        let timeout = profile.timeout_config();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(profile.region.clone()))
            .endpoint_url(&profile.endpoint)
            .retry_config(
                aws_config::retry::RetryConfig::standard()
                    .with_max_attempts(retry.max_attempts)
                    .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
                    .with_max_backoff(Duration::from_millis(retry.max_backoff_ms)),
            )
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .connect_timeout(Duration::from_millis(timeout.connect_ms))
                    .read_timeout(Duration::from_millis(timeout.read_ms))
                    .build(),
            )
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.force_path_style())
            .build();

        tracing::debug!(
            profile = %profile.name,
            endpoint = %profile.endpoint,
            "created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            profile,
        })
    }
}

/// Map an SDK error onto the bkt error kinds
fn map_sdk_error<E>(err: SdkError<E>, resource: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code().map(str::to_string);
    classify_error(
        code.as_deref(),
        status,
        resource,
        DisplayErrorContext(&err).to_string(),
    )
}

/// Classify a failed request by S3 error code and HTTP status
///
/// HEAD requests carry no error body, so the status code is the only signal.
fn classify_error(code: Option<&str>, status: Option<u16>, resource: &str, detail: String) -> Error {
    match (code, status) {
        (Some("NoSuchKey" | "NoSuchBucket" | "NotFound"), _) | (_, Some(404)) => {
            Error::NotFound(resource.to_string())
        }
        (Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"), _)
        | (_, Some(403)) => Error::Auth(resource.to_string()),
        (Some(code @ ("BucketNotEmpty" | "BucketAlreadyExists" | "BucketAlreadyOwnedByYou")), _) => {
            Error::Conflict(format!("{resource}: {code}"))
        }
        (_, Some(409)) => Error::Conflict(resource.to_string()),
        _ => Error::Network(detail),
    }
}

/// Turn `Ok`/`NotFound` into `Some`/`None`
fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<Timestamp> {
    Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}

fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

fn convert_grantee(grantee: &aws_sdk_s3::types::Grantee) -> Option<Grantee> {
    if let Some(uri) = grantee.uri() {
        return Some(Grantee::Group {
            uri: uri.to_string(),
        });
    }
    if let Some(address) = grantee.email_address() {
        return Some(Grantee::Email {
            address: address.to_string(),
        });
    }
    grantee.id().map(|id| Grantee::CanonicalUser {
        id: id.to_string(),
        display_name: grantee.display_name().map(str::to_string),
    })
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn lookup_bucket(&self, bucket: &str) -> Result<Option<BucketInfo>> {
        let result = self
            .inner
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| BucketInfo::new(bucket))
            .map_err(|e| map_sdk_error(e, bucket));

        found(result)
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .inner
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| map_sdk_error(e, bucket))?;

            for object in response.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let mut info = ObjectInfo::file(bucket, key, object.size().unwrap_or(0));
                info.last_modified = object.last_modified().and_then(to_timestamp);
                info.etag = object.e_tag().map(trim_etag);
                objects.push(info);
            }

            if response.is_truncated().unwrap_or(false) {
                continuation_token = response.next_continuation_token().map(str::to_string);
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<Option<ObjectInfo>> {
        let resource = format!("{bucket}:{key}");
        let response = match self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return found(Err(map_sdk_error(e, &resource))),
        };

        let mut info = ObjectInfo::file(bucket, key, response.content_length().unwrap_or(0));
        info.last_modified = response.last_modified().and_then(to_timestamp);
        info.etag = response.e_tag().map(trim_etag);
        info.content_type = response.content_type().map(str::to_string);
        if let Some(metadata) = response.metadata() {
            info.metadata = metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<BTreeMap<_, _>>();
        }

        Ok(Some(info))
    }

    async fn create_bucket(&self, bucket: &str, acl: Option<CannedAcl>) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        if let Some(acl) = acl {
            request = request.acl(BucketCannedAcl::from(acl.as_str()));
        }

        if self.profile.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(
                        self.profile.region.as_str(),
                    ))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}:{key}")))?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .set_content_type(content_type.clone())
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}:{key}")))?;

        let mut info = ObjectInfo::file(bucket, key, size);
        info.etag = response.e_tag().map(trim_etag);
        info.content_type = content_type;
        info.last_modified = Some(Timestamp::now());

        Ok(info)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resource = format!("{bucket}:{key}");
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &resource))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(format!("{resource}: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn set_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()> {
        self.inner
            .put_bucket_acl()
            .bucket(bucket)
            .acl(BucketCannedAcl::from(acl.as_str()))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        Ok(())
    }

    async fn set_object_acl(&self, bucket: &str, key: &str, acl: CannedAcl) -> Result<()> {
        self.inner
            .put_object_acl()
            .bucket(bucket)
            .key(key)
            .acl(ObjectCannedAcl::from(acl.as_str()))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}:{key}")))?;

        Ok(())
    }

    async fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Acl> {
        let response = self
            .inner
            .get_object_acl()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}:{key}")))?;

        let owner = response.owner().map(|owner| Owner {
            id: owner.id().unwrap_or_default().to_string(),
            display_name: owner.display_name().map(str::to_string),
        });

        let grants = response
            .grants()
            .iter()
            .filter_map(|grant| {
                let grantee = convert_grantee(grant.grantee()?)?;
                let permission = grant.permission()?.as_str().to_string();
                Some(Grant::new(grantee, permission))
            })
            .collect();

        Ok(Acl { owner, grants })
    }
}

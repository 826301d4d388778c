//! Mock object store and log capture shared by command tests

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bkt_core::{Acl, BucketInfo, CannedAcl, ObjectInfo, ObjectStore, Result};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use super::Session;
use crate::output::{Formatter, OutputConfig};

mockall::mock! {
    pub Store {}

    #[async_trait]
    impl ObjectStore for Store {
        async fn lookup_bucket(&self, bucket: &str) -> Result<Option<BucketInfo>>;
        async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>>;
        async fn head_object(&self, bucket: &str, key: &str) -> Result<Option<ObjectInfo>>;
        async fn create_bucket(&self, bucket: &str, acl: Option<CannedAcl>) -> Result<()>;
        async fn delete_bucket(&self, bucket: &str) -> Result<()>;
        async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            data: Vec<u8>,
            content_type: Option<String>,
        ) -> Result<ObjectInfo>;
        async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
        async fn set_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()>;
        async fn set_object_acl(&self, bucket: &str, key: &str, acl: CannedAcl) -> Result<()>;
        async fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Acl>;
    }
}

impl MockStore {
    /// Answer bucket lookups for the given names only
    pub fn with_buckets(buckets: &'static [&'static str]) -> Self {
        let mut store = Self::new();
        store
            .expect_lookup_bucket()
            .returning(move |name| Ok(buckets.contains(&name).then(|| BucketInfo::new(name))));
        store
    }

    pub fn into_session(self, default_bucket: Option<&str>) -> Session {
        Session::new(Box::new(self), default_bucket.map(str::to_string))
    }
}

/// Formatter that prints nothing but errors
pub fn quiet_formatter() -> Formatter {
    Formatter::new(OutputConfig {
        quiet: true,
        no_progress: true,
        ..Default::default()
    })
}

/// Collects formatted WARN and ERROR events on the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install as the thread default; events are captured until the guard drops
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        (capture.clone(), tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

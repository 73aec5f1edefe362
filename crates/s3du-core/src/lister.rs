//! Bucket enumeration.
//!
//! [`BucketLister`] walks one bucket, or every bucket the credentials can
//! see, page by page, and pushes each [`ObjectRecord`] into a [`RecordSink`]
//! as soon as it arrives. The S3 API sits behind [`ObjectSource`];
//! [`S3ObjectSource`] is the `aws-sdk-s3` implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use tracing::{debug, info};

use crate::config::S3duConfig;
use crate::error::{S3duError, S3duResult};
use crate::types::{ObjectRecord, StorageClass};

/// Normalize a key prefix so that a non-empty prefix ends with `/`.
///
/// # Examples
///
/// ```
/// use s3du_core::normalize_prefix;
///
/// assert_eq!(normalize_prefix(None), "");
/// assert_eq!(normalize_prefix(Some("photos")), "photos/");
/// assert_eq!(normalize_prefix(Some("photos/")), "photos/");
/// ```
#[must_use]
pub fn normalize_prefix(prefix: Option<&str>) -> String {
    match prefix {
        None | Some("") => String::new(),
        Some(p) if p.ends_with('/') => p.to_owned(),
        Some(p) => format!("{p}/"),
    }
}

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// One page of a `ListObjectsV2` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Objects on this page.
    pub records: Vec<ObjectRecord>,
    /// Token for the next page, if the listing continues.
    pub next_continuation: Option<String>,
}

/// Source of bucket names and object pages.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Names of every bucket visible to the caller.
    async fn bucket_names(&self) -> S3duResult<Vec<String>>;

    /// Fetch one page of objects under `prefix`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> S3duResult<ListPage>;
}

/// Destination for listed records.
pub trait RecordSink {
    /// Accept one record.
    fn accept(&mut self, record: ObjectRecord) -> S3duResult<()>;
}

impl RecordSink for Vec<ObjectRecord> {
    fn accept(&mut self, record: ObjectRecord) -> S3duResult<()> {
        self.push(record);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// S3ObjectSource
// ---------------------------------------------------------------------------

/// [`ObjectSource`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct S3ObjectSource {
    client: Client,
    page_size: i32,
}

impl S3ObjectSource {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client, page_size: i32) -> Self {
        Self { client, page_size }
    }

    /// Build a client from the default AWS provider chain, applying the
    /// configured endpoint override and addressing style.
    pub async fn from_config(config: &S3duConfig) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);
        if let Some(url) = &config.endpoint_url {
            debug!(endpoint_url = %url, "using custom S3 endpoint");
            builder = builder.endpoint_url(url);
        }
        Self::new(Client::from_conf(builder.build()), config.page_size)
    }
}

fn listing_error(bucket: &str, err: &impl std::error::Error) -> S3duError {
    S3duError::Listing {
        bucket: bucket.to_owned(),
        source: DisplayErrorContext(err).to_string().into(),
    }
}

#[async_trait]
impl ObjectSource for S3ObjectSource {
    async fn bucket_names(&self) -> S3duResult<Vec<String>> {
        let mut names = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let resp = self
                .client
                .list_buckets()
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| listing_error("*", &e))?;

            names.extend(
                resp.buckets()
                    .iter()
                    .filter_map(|b| b.name())
                    .map(ToOwned::to_owned),
            );

            match resp.continuation_token() {
                Some(token) if !token.is_empty() => continuation = Some(token.to_owned()),
                _ => break,
            }
        }
        Ok(names)
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> S3duResult<ListPage> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(self.page_size)
            .set_continuation_token(continuation);
        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        let resp = req.send().await.map_err(|e| listing_error(bucket, &e))?;

        let records = resp
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?;
                Some(ObjectRecord {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                    size: obj.size().and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
                    storage_class: obj
                        .storage_class()
                        .map_or(StorageClass::Standard, |c| StorageClass::from(c.as_str())),
                })
            })
            .collect();

        let next_continuation = resp
            .next_continuation_token()
            .filter(|_| resp.is_truncated() != Some(false))
            .map(ToOwned::to_owned);

        Ok(ListPage {
            records,
            next_continuation,
        })
    }
}

// ---------------------------------------------------------------------------
// BucketLister
// ---------------------------------------------------------------------------

/// Enumerates objects from an [`ObjectSource`].
#[derive(Debug)]
pub struct BucketLister<S> {
    source: S,
    bucket: Option<String>,
    prefix: String,
}

impl<S: ObjectSource> BucketLister<S> {
    /// List every visible bucket with no prefix.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            bucket: None,
            prefix: String::new(),
        }
    }

    /// Restrict the listing to one bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: Option<String>) -> Self {
        self.bucket = bucket.filter(|b| !b.is_empty());
        self
    }

    /// Restrict the listing to keys under `prefix`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    /// The normalized key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The buckets this lister will walk.
    pub async fn buckets(&self) -> S3duResult<Vec<String>> {
        match &self.bucket {
            Some(bucket) => Ok(vec![bucket.clone()]),
            None => self.source.bucket_names().await,
        }
    }

    /// Walk every page of every target bucket into `sink`. Returns the
    /// number of records delivered.
    pub async fn list_into<K>(&self, sink: &mut K) -> S3duResult<u64>
    where
        K: RecordSink + ?Sized,
    {
        let buckets = self.buckets().await?;
        let mut count: u64 = 0;

        for bucket in &buckets {
            let uri = format!("s3://{bucket}/{}", self.prefix);
            info!(%uri, count, "listing bucket");

            let mut continuation = None;
            loop {
                let page = self
                    .source
                    .list_page(bucket, &self.prefix, continuation.take())
                    .await?;
                for record in page.records {
                    sink.accept(record)?;
                    count += 1;
                }

                match page.next_continuation {
                    Some(token) => {
                        info!(%uri, count, "listing continues");
                        continuation = Some(token);
                    }
                    None => break,
                }
            }
        }

        debug!(buckets = buckets.len(), count, "listing complete");
        Ok(count)
    }
}

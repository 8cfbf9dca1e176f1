use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// An uploaded file, held in memory for the duration of the request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `image` under `folder` and returns its public URL.
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String>;
}

/// Object key `{folder}/{unix_millis}-{file_name}`. Only the last path
/// component of the client-supplied name is kept.
pub fn object_key(folder: &str, file_name: &str, now: DateTime<Utc>) -> String {
    let base = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .find(|part| !part.is_empty())
        .unwrap_or("upload");
    format!(
        "{}/{}-{}",
        folder.trim_matches('/'),
        now.timestamp_millis(),
        base
    )
}

/// Joins `key` onto `base`, percent-encoding every key segment.
pub fn public_url(base: &str, key: &str) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::Config(format!("Invalid storage base URL {}: {}", base, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::Config(format!("Storage base URL cannot hold a path: {}", base)))?;
        segments.pop_if_empty();
        segments.extend(key.split('/'));
    }
    Ok(url.to_string())
}

#[derive(Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    /// Builds a client from static credentials. A custom endpoint switches to
    /// path-style addressing, which S3-compatible servers expect.
    pub fn from_config(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "job-board-static",
        );
        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let public_base_url = match (&config.public_base_url, &config.endpoint) {
            (Some(base), _) => base.clone(),
            (None, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
            (None, None) => format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region),
        };

        Self::new(
            S3Client::from_conf(builder.build()),
            config.bucket.clone(),
            public_base_url,
        )
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String> {
        let key = object_key(folder, &image.file_name, Utc::now());
        let size = image.bytes.len();
        let content_type = image
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!(
                    "Failed to upload s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, size, "uploaded job picture");
        public_url(&self.public_base_url, &key)
    }
}

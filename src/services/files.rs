//! Object storage client
//!
//! Uploads screenshots and thumbnails to the hosted object storage over its
//! HTTP API and returns the public URL. The rest of the system only ever
//! persists that URL string. Every request carries a bounded timeout; a
//! timeout surfaces as a retryable dependency error, distinct from any
//! domain failure.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::config::StorageConfig;
use crate::services::stores::FileStore;
use crate::utils::errors::{Result, TholviError};

#[derive(Clone)]
pub struct HttpFileStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpFileStore {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let mut base_url = Url::parse(&config.base_url)?;
        // A base without a trailing slash would drop its last path segment
        // when joined against.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn object_url(&self, bucket: &str, path: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("object/{bucket}/{path}"))?)
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("object/public/{bucket}/{path}"))?)
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let upload_url = self.object_url(bucket, path)?;
        debug!(bucket = bucket, path = path, size = bytes.len(), "Uploading object");

        let response = self
            .client
            .post(upload_url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TholviError::Timeout(format!("object upload to bucket {bucket}"))
                } else {
                    TholviError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(TholviError::Storage(format!(
                "Upload to {bucket}/{path} failed with {status}: {detail}"
            )));
        }

        let public = self.public_url(bucket, path)?;
        info!(bucket = bucket, path = path, "Object uploaded");
        Ok(public.to_string())
    }
}

use async_trait::async_trait;
use tracing::info;

use crate::config::BlobConfig;
use crate::error::{Error, Result};

/// Object storage for audio blobs and rendered reports
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` under `key` and return a publicly retrievable URL
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Blob store backed by the GCS JSON media-upload endpoint.
///
/// Objects are uploaded into a single configured bucket and addressed by
/// their canonical public URL; the bucket is expected to allow public
/// reads.
pub struct GcsBlobStore {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    token: String,
}

impl GcsBlobStore {
    pub fn new(http: reqwest::Client, config: &BlobConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let upload_url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.base_url, self.bucket, key
        );

        let size = bytes.len();
        let response = self
            .http
            .post(&upload_url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!("upload returned {status}: {detail}")));
        }

        let public_url = format!("{}/{}/{}", self.base_url, self.bucket, key);
        info!(key, size, "blob uploaded");
        Ok(public_url)
    }
}

//! Raw photo download from the chat transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use rc_domain::config::MediaConfig;
use rc_domain::error::{Error, Result};

#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Fetch the bytes behind a transport blob reference.
    async fn fetch(&self, blob_ref: &str) -> Result<Vec<u8>>;
}

/// Resolves `{blob_base_url}/{blob_ref}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBlobSource {
    http: Client,
    base_url: String,
}

impl HttpBlobSource {
    pub fn new(cfg: &MediaConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cfg.blob_base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, blob_ref: &str) -> String {
        format!("{}/{}", self.base_url, blob_ref.trim_start_matches('/'))
    }
}

#[async_trait]
impl BlobSource for HttpBlobSource {
    async fn fetch(&self, blob_ref: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(self.url(blob_ref))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if status.is_server_error() {
            // 5xx: transient
            return Err(Error::Http(format!("GET {blob_ref} returned {status}")));
        }
        if !status.is_success() {
            // 4xx: the reference is gone or forbidden, retrying will not help
            return Err(Error::Media(format!("GET {blob_ref} returned {status}")));
        }

        let bytes = resp.bytes().await.map_err(from_reqwest)?;
        Ok(bytes.to_vec())
    }
}

/// Map a reqwest error onto the shared error type.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

//! Token-authenticated HTTP blob store backend
//!
//! Talks to a hosted blob service over HTTP. Failures are classified from
//! response status codes, never from message text: 409 is a key conflict,
//! 404 a missing object, and everything else (including auth rejections and
//! timeouts) maps to `Unavailable`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::traits::{ObjectMeta, ObjectStore, PutOptions, StorageError, StorageResult, StoredObject};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEntry {
    pathname: String,
    url: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    uploaded_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    blobs: Vec<ListEntry>,
}

impl HttpBlobStore {
    pub fn new(base_url: String, token: String) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(HttpBlobStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn transport_error(key: &str, err: reqwest::Error) -> StorageError {
        StorageError::Unavailable(format!("request for {} failed: {}", key, err))
    }

    /// Map a non-success response to a typed error by status code.
    fn status_error(key: &str, status: reqwest::StatusCode) -> StorageError {
        match status.as_u16() {
            409 => StorageError::AlreadyExists(key.to_string()),
            404 => StorageError::NotFound(key.to_string()),
            code => StorageError::Unavailable(format!("blob service returned {} for {}", code, key)),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpBlobStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        options: PutOptions,
    ) -> StorageResult<StoredObject> {
        let size = data.len() as u64;
        let response = self
            .client
            .put(self.object_url(key))
            .bearer_auth(&self.token)
            .header("x-allow-overwrite", if options.allow_overwrite { "true" } else { "false" })
            .body(data)
            .send()
            .await
            .map_err(|e| Self::transport_error(key, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(key, status));
        }

        let body: PutResponse = response
            .json()
            .await
            .map_err(|e| Self::transport_error(key, e))?;

        Ok(StoredObject {
            key: key.to_string(),
            url: body.url,
            size: body.size.unwrap_or(size),
        })
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(key))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Self::transport_error(key, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(key, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::FetchFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectMeta>> {
        let response = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.token)
            .query(&[("prefix", prefix)])
            .send()
            .await
            .map_err(|e| Self::transport_error(prefix, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(prefix, status));
        }

        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| Self::transport_error(prefix, e))?;

        Ok(body
            .blobs
            .into_iter()
            .map(|entry| ObjectMeta {
                key: entry.pathname,
                url: entry.url,
                size: entry.size,
                uploaded_at: entry.uploaded_at,
            })
            .collect())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let response = self
            .client
            .head(self.object_url(key))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Self::transport_error(key, e))?;

        match response.status().as_u16() {
            code if (200..300).contains(&code) => Ok(true),
            404 => Ok(false),
            _ => Err(Self::status_error(key, response.status())),
        }
    }
}

//! Storage abstraction trait
//!
//! This module defines the `ObjectStore` trait that all storage backends must
//! implement, and the typed errors they report. Backends classify failures by
//! kind (conflict, missing, transport) so callers never inspect message text.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key exists and overwrite was not allowed.
    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    /// Transport or authentication failure talking to the backing store.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Fetch failed for {key}: {reason}")]
    FetchFailed { key: String, reason: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Options for a put operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PutOptions {
    /// When false (the default), writing to an existing key fails with
    /// `AlreadyExists` and leaves the stored value untouched.
    pub allow_overwrite: bool,
}

/// Metadata returned after a successful put.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size: u64,
}

/// One entry of a list-by-prefix result.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    pub key: String,
    pub url: String,
    pub size: u64,
    /// RFC 3339 upload time, when the backend reports one.
    pub uploaded_at: Option<String>,
}

/// Object store abstraction: key -> bytes with list-by-prefix.
///
/// No pagination guarantee is assumed: `list` returns whatever the backend
/// yields for the prefix, and callers tolerate partial results.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`. Fails with `AlreadyExists` when the key is
    /// taken and `options.allow_overwrite` is false.
    async fn put(&self, key: &str, data: Vec<u8>, options: PutOptions)
        -> StorageResult<StoredObject>;

    /// Fetch one object by key.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// List all objects whose key starts with `prefix`.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectMeta>>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}

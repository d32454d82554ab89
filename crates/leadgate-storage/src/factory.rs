//! Storage factory: builds the configured `ObjectStore` backend.

use std::sync::Arc;

use leadgate_core::{Config, StorageBackend};

use crate::http::HttpBlobStore;
use crate::local::LocalStore;
use crate::traits::{ObjectStore, StorageError, StorageResult};

/// Create the object store named by the configuration. Missing settings for
/// the selected backend are a hard configuration error.
pub async fn create_object_store(config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend() {
        StorageBackend::Local => {
            let path = config.local_storage_path().ok_or_else(|| {
                StorageError::Config(
                    "LOCAL_STORAGE_PATH is required for the local storage backend".to_string(),
                )
            })?;
            let base_url = config
                .local_storage_base_url()
                .unwrap_or("http://localhost:3000/blobs")
                .to_string();
            let store = LocalStore::new(path, base_url).await?;
            tracing::info!(path = %path, "Local object store initialized");
            Ok(Arc::new(store))
        }
        StorageBackend::Http => {
            let base_url = config.blob_api_url().ok_or_else(|| {
                StorageError::Config(
                    "BLOB_API_URL is required for the http storage backend".to_string(),
                )
            })?;
            let token = config.blob_read_write_token().ok_or_else(|| {
                StorageError::Config(
                    "BLOB_READ_WRITE_TOKEN is required for storing submissions".to_string(),
                )
            })?;
            let store = HttpBlobStore::new(base_url.to_string(), token.to_string())?;
            tracing::info!(base_url = %base_url, "HTTP blob store initialized");
            Ok(Arc::new(store))
        }
    }
}

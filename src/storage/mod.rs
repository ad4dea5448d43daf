//! Object-storage capability used by the deploy engine.
//!
//! The engine only ever talks to [`ObjectStorage`]; the COS adapter lives in
//! [`cos`] and tests substitute an in-memory implementation.

mod cos;

pub use cos::CosStorage;

use crate::config::BucketConfig;
use crate::manifest::RemoteEntry;
use crate::utils::DELETE_BATCH_CAP;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a storage transport.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("list failed for prefix {prefix}: {message}")]
    List { prefix: String, message: String },

    #[error("put failed for {key}: {message}")]
    Put { key: String, message: String },

    #[error("batch delete failed: {0}")]
    Delete(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One page of a prefix listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<RemoteEntry>,
    /// Token for the next page, `None` once the listing is complete.
    pub next_continuation: Option<String>,
}

/// Per-key failure reported inside an otherwise accepted delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyError {
    pub key: String,
    pub message: String,
}

/// Transport response to a delete-many request.
///
/// Keys of the request that are not listed in `errors` count as deleted.
#[derive(Debug, Clone, Default)]
pub struct DeleteResponse {
    pub errors: Vec<KeyError>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List one page of objects whose key starts with `prefix`.
    async fn list_objects(
        &self,
        bucket: &BucketConfig,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError>;

    /// Stream `body` (exactly `content_length` bytes) to `key`.
    async fn put_object(
        &self,
        bucket: &BucketConfig,
        key: &str,
        body: tokio::fs::File,
        content_length: u64,
    ) -> Result<(), StorageError>;

    /// Delete up to [`ObjectStorage::max_delete_batch`] keys in one request.
    async fn delete_objects(
        &self,
        bucket: &BucketConfig,
        keys: &[String],
    ) -> Result<DeleteResponse, StorageError>;

    /// Largest number of keys `delete_objects` accepts per call.
    fn max_delete_batch(&self) -> usize {
        DELETE_BATCH_CAP
    }
}

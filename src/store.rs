use async_trait::async_trait;
use thiserror::Error;

use crate::course::Course;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("authentication to the store failed")]
    Auth,

    #[error("bucket `{0}` not found")]
    BucketNotFound(String),

    #[error("document `{0}` not found")]
    NotFound(String),

    #[error("document `{0}` already exists")]
    DuplicateKey(String),

    #[error("query failed (code {code}): {msg}")]
    Query { code: u64, msg: String },

    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed store document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Single-document operations against the backing document database. The HTTP
/// layer holds this as `Arc<dyn DocumentStore>` so handlers and tests depend
/// on the interface rather than a live cluster.
///
/// `get`, `upsert` and `remove` are part of the store surface but have no
/// caller in the HTTP layer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by key. Fails with [`StoreError::NotFound`] if absent.
    async fn get(&self, key: &str) -> Result<Course, StoreError>;

    /// Create a new document at `key`. Fails with [`StoreError::DuplicateKey`]
    /// if the key already exists.
    async fn insert(&self, key: &str, doc: &Course) -> Result<(), StoreError>;

    /// Create or overwrite the document at `key`.
    async fn upsert(&self, key: &str, doc: &Course) -> Result<(), StoreError>;

    /// Delete the document at `key`.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Substring match against the `courseName` field of every document in the
    /// configured collection, materialized into a list.
    async fn query(&self, term: &str) -> Result<Vec<Course>, StoreError>;
}

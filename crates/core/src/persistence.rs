//! Persistence capabilities the session core consumes.
//!
//! History, bookmarks, and the reading list live behind async traits
//! so the embedder can back them with whatever storage it owns. The
//! core never retries a failed write and never blocks navigation on
//! one; failures propagate to the caller (or are logged when the write
//! was fire-and-forget, see [`VisitPipeline`](crate::VisitPipeline)).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::classifier::VisitKind;

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The backend is not available (profile closed, shutdown).
    #[error("store unavailable")]
    Unavailable,
}

/// Records history visits keyed by (URL, title, visit kind).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Records one visit. Called once per classified completed
    /// navigation.
    async fn record_visit(
        &self,
        url: &Url,
        title: Option<&str>,
        kind: VisitKind,
    ) -> Result<(), StoreError>;
}

/// Bookmark existence and mutation, keyed by URL.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn is_bookmarked(&self, url: &Url) -> Result<bool, StoreError>;
    async fn add_bookmark(&self, url: &Url, title: Option<&str>) -> Result<(), StoreError>;
    async fn remove_bookmark(&self, url: &Url) -> Result<(), StoreError>;
}

/// One saved reading-list record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingListRecord {
    pub url: Url,
    pub title: String,
    /// Unix timestamp in milliseconds when the record was added.
    pub added_at_ms: u64,
}

/// Reading-list CRUD, keyed by URL.
#[async_trait]
pub trait ReadingListStore: Send + Sync {
    async fn add_record(&self, record: ReadingListRecord) -> Result<(), StoreError>;
    async fn remove_record(&self, url: &Url) -> Result<(), StoreError>;
    async fn record_for_url(&self, url: &Url) -> Result<Option<ReadingListRecord>, StoreError>;
}

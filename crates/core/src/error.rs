//! Error types for the session core.

use thiserror::Error;

use crate::persistence::StoreError;
use crate::session::SessionId;

/// Result type alias for session-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the session core.
///
/// Everything here is local and recoverable; nothing in this crate is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum Error {
    /// The manager was shut down; no further sessions can be created.
    #[error("session manager has been shut down")]
    ManagerShutDown,

    /// The id does not name a live session.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The session has not committed any content yet.
    #[error("session {0} has no committed content")]
    NoContent(SessionId),

    /// A tray snapshot was written by an incompatible version.
    #[error("unsupported tray snapshot schema version: {0}")]
    SnapshotSchema(u32),

    /// Error from the engine boundary.
    #[error(transparent)]
    Engine(#[from] tabkit_engine::Error),

    /// Error from a persistence capability.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

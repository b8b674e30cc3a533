//! Error types for the engine boundary.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors an engine implementation may surface to the session core.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine could not allocate a content view.
    #[error("failed to create engine view: {0}")]
    ViewCreation(String),

    /// An operation was issued against a view that was already released.
    #[error("engine view has been released")]
    ViewReleased,

    /// The engine rejected a request before starting any navigation.
    #[error("invalid load request: {0}")]
    InvalidRequest(String),

    /// Engine-internal failure that is not a navigation outcome.
    #[error("engine error: {0}")]
    Internal(String),
}

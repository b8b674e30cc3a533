//! The engine view and view-factory traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::handle::{EngineViewHandle, NavigationHandle};
use crate::history::BackForwardList;
use crate::request::LoadRequest;

/// One engine content view, exclusively owned by a single session.
///
/// Implementations wrap a real web view (or a test double). All
/// methods may be called from the session core's owner context; the
/// engine delivers its side of the conversation as
/// [`EngineEvent`](crate::EngineEvent)s through whatever channel the
/// embedder wires up.
#[async_trait]
pub trait EngineView: Send + Sync {
    /// Returns the opaque handle identifying this view.
    fn handle(&self) -> EngineViewHandle;

    /// Starts a navigation.
    ///
    /// Returns `Ok(None)` when the engine rejects the request
    /// synchronously (for example a scheme it refuses to load); in that
    /// case no navigation was started and no events will follow.
    async fn load_request(&self, request: &LoadRequest) -> Result<Option<NavigationHandle>>;

    /// Reloads the current content.
    async fn reload(&self) -> Result<()>;

    /// Stops the in-flight navigation, if any.
    async fn stop(&self) -> Result<()>;

    /// Navigates one entry back in this view's history.
    async fn go_back(&self) -> Result<()>;

    /// Navigates one entry forward in this view's history.
    async fn go_forward(&self) -> Result<()>;

    /// Navigates in place to an existing back/forward entry.
    async fn go_to_entry(&self, token: u64) -> Result<()>;

    /// Returns a snapshot of this view's back/forward list.
    async fn back_forward_list(&self) -> BackForwardList;

    /// Releases engine-side resources for this view.
    ///
    /// Must be idempotent. After release the engine stops delivering
    /// events for this view's handle.
    async fn release(&self);
}

/// Factory for engine content views.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Allocates a new content view.
    async fn create_view(&self) -> Result<Arc<dyn EngineView>>;
}

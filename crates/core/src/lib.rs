//! tabkit: a host-UI-agnostic tab/navigation-session manager.
//!
//! This crate is the coordination core of a multi-tab browser chrome:
//! it tracks concurrent web content sessions (tabs), multiplexes
//! selection across them, classifies completed navigations into
//! history-visit kinds, and handles reader-mode URL rewriting with a
//! readability cache. It renders nothing and owns no storage; the web
//! engine, the persistence backends, and the UI shell plug in through
//! traits.
//!
//! # Pieces
//!
//! - [`SessionManager`] owns the ordered tab collection and the
//!   selection, and fans lifecycle events out to registered
//!   [`SessionEventListener`]s.
//! - [`Session`] wraps one engine content view: URLs, loading state,
//!   progress, back/forward capability, transient notices, and a
//!   name-keyed [`SessionHelper`] registry for cross-cutting behaviors.
//! - [`NavigationClassifier`] maps navigation handles to
//!   [`VisitKind`]s with a write-once/read-once intent table.
//! - [`reader`] encodes/decodes reader-mode URLs and plans transitions
//!   that reuse adjacent engine history entries where possible.
//! - [`VisitPipeline`] wires the three together and records visits
//!   through a [`HistoryStore`] without ever blocking navigation.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabkit::{NavigationClassifier, SessionManager, VisitKind, VisitPipeline};
//! use tabkit_engine::LoadRequest;
//!
//! # async fn demo(engine: Arc<dyn tabkit_engine::Engine>) -> tabkit::Result<()> {
//! let manager = Arc::new(SessionManager::new(engine));
//! let classifier = Arc::new(NavigationClassifier::new());
//! let pipeline = VisitPipeline::new(manager.clone(), classifier.clone());
//!
//! let id = manager
//!     .create_session(Some(LoadRequest::parse("https://example.com/").unwrap()))
//!     .await?;
//! manager.select_session(id)?;
//! // Engine events flow in through pipeline.handle_event(view, event).
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Session and manager state is serialized behind internal mutexes and
//! listener callbacks are invoked without holding any of them. Engine
//! callbacks must be marshaled by the embedder onto one logical writer
//! context before calling [`SessionManager::handle_engine_event`];
//! non-owner contexts read through snapshot copies
//! ([`Session::state`], [`SessionManager::sessions`]).

mod classifier;
mod error;
mod pipeline;

pub mod persistence;
pub mod reader;
pub mod session;
pub mod testing;

pub use classifier::{NavigationClassifier, VisitKind};
pub use error::{Error, Result};
pub use persistence::{
    BookmarkStore, HistoryStore, ReadingListRecord, ReadingListStore, StoreError,
};
pub use pipeline::VisitPipeline;
pub use reader::{ExtractedContent, ReadabilityCache, ReaderConfig, ReaderMode, ReaderTransition};
pub use session::events::{ListenerId, SessionEventListener};
pub use session::manager::{CompletedNavigation, SessionManager};
pub use session::snapshot::{SessionSnapshot, TRAY_SNAPSHOT_SCHEMA_VERSION, TraySnapshot};
pub use session::{NoticeId, Session, SessionHelper, SessionId, SessionState, TransientNotice};

// Re-export the engine boundary for convenience.
pub use tabkit_engine;

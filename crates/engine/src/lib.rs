//! Engine capability boundary for the tabkit session core.
//!
//! This crate defines the contract between the session layer and an
//! embedded web engine. It owns no policy: handles are opaque tokens,
//! events describe what the engine observed, and the [`EngineView`]
//! trait is the surface a real engine binding (or a test double)
//! implements.
//!
//! The session core never talks to an engine directly; it holds an
//! `Arc<dyn EngineView>` per session and consumes [`EngineEvent`]s the
//! embedder marshals back onto its owner context.

mod error;
mod events;
mod handle;
mod history;
mod request;
mod view;

pub use error::{Error, Result};
pub use events::EngineEvent;
pub use handle::{EngineViewHandle, NavigationHandle};
pub use history::{BackForwardEntry, BackForwardList};
pub use request::LoadRequest;
pub use view::{Engine, EngineView};

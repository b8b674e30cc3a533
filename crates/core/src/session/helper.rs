//! The session helper capability trait.

use downcast_rs::{DowncastSync, impl_downcast};

/// A cross-cutting behavior composed onto a session.
///
/// Reader mode, favicon extraction, login-form detection, and similar
/// concerns attach to a [`Session`](super::Session) through a
/// name-keyed registry of this trait instead of inheritance, so new
/// behaviors can be added without modifying the session itself.
/// Callers recover the concrete type with
/// [`downcast_arc`](downcast_rs::DowncastSync).
pub trait SessionHelper: DowncastSync {
    /// The registry name this helper is conventionally stored under.
    fn name(&self) -> &'static str;
}

impl_downcast!(sync SessionHelper);

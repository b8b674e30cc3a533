//! Typed listener interface for session lifecycle events.
//!
//! Listener registration is explicit (add/remove with an id) and
//! fan-out order follows registration order. The manager holds weak
//! references: dropping the listener is enough to stop deliveries, and
//! the table is pruned on every fan-out. Callbacks are always invoked
//! with no manager lock held, so a listener may call back into the
//! manager without deadlocking.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Session;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener@{}", self.0)
    }
}

/// Receives session lifecycle events from a
/// [`SessionManager`](super::manager::SessionManager).
///
/// All methods default to no-ops so listeners implement only what they
/// care about. Callbacks run synchronously on whatever context mutated
/// the manager.
#[allow(unused_variables)]
pub trait SessionEventListener: Send + Sync {
    /// A session was created. Fires before `session_added`.
    fn session_created(&self, session: &Arc<Session>) {}

    /// A session was appended to the tray at `index`.
    fn session_added(&self, session: &Arc<Session>, index: usize) {}

    /// The previous selection is being replaced. Fires before
    /// `session_selected`; either reference may be absent.
    fn session_deselected(&self, previous: Option<&Arc<Session>>, next: Option<&Arc<Session>>) {}

    /// A new selection took effect. The manager already reflects it.
    fn session_selected(&self, previous: Option<&Arc<Session>>, next: Option<&Arc<Session>>) {}

    /// A session was removed; `prior_index` is where it sat in the
    /// tray order before removal. Its engine view is already released.
    fn session_removed(&self, session: &Arc<Session>, prior_index: usize) {}
}

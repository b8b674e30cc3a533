//! Opaque handles issued by the engine.
//!
//! Both handle types are plain integers under the hood, but the session
//! core treats them as opaque correlation tokens: a view handle ties
//! asynchronous engine callbacks back to the session that owns the
//! view, and a navigation handle correlates a completed navigation with
//! the intent recorded when it was initiated.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_VIEW_HANDLE: AtomicU64 = AtomicU64::new(1);
static NEXT_NAVIGATION_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Identifies one engine content view for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineViewHandle(u64);

impl EngineViewHandle {
    /// Allocates a fresh, process-unique view handle.
    ///
    /// Intended for engine implementations; the session core only ever
    /// compares handles it has been given.
    pub fn next() -> Self {
        Self(NEXT_VIEW_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EngineViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view@{}", self.0)
    }
}

/// Identifies one in-flight (or completed) navigation.
///
/// Engines are not required to supply a handle on completion; callers
/// must tolerate `Option<NavigationHandle>` everywhere a completion
/// callback is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationHandle(u64);

impl NavigationHandle {
    /// Allocates a fresh, process-unique navigation handle.
    pub fn next() -> Self {
        Self(NEXT_NAVIGATION_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NavigationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nav@{}", self.0)
    }
}

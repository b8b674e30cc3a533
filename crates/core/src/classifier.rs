//! Visit classification for completed navigations.
//!
//! History relevance ranking cares *why* a page was visited: a URL the
//! user typed carries more signal than a link they happened to follow.
//! The classifier is a write-once/read-once table keyed by the
//! engine's navigation handle. Intents are recorded at the moment a
//! classified action initiates a navigation and consumed exactly once
//! when the engine reports completion.
//!
//! Most navigations are organic link follows, so anything without a
//! recorded intent resolves to [`VisitKind::Link`]. The engine is also
//! allowed to complete a navigation without a correlation token at
//! all; that case resolves to `Link` as well rather than inventing
//! correlation the engine does not guarantee.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tabkit_engine::NavigationHandle;

/// Why a navigation happened, as recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitKind {
    /// The user typed the URL (or picked a completion for typed input).
    Typed,
    /// The user followed a link. Default for unclassified navigations.
    Link,
    /// The user opened a bookmark.
    Bookmark,
}

#[derive(Debug, Clone, Copy)]
enum Intent {
    Kind(VisitKind),
    Ignored,
}

/// Write-once/read-once mapping from navigation handle to visit intent.
#[derive(Default)]
pub struct NavigationClassifier {
    pending: Mutex<HashMap<NavigationHandle, Intent>>,
}

impl NavigationClassifier {
    /// Creates an empty classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the visit kind for a navigation initiated by a
    /// classified user action. Call at initiation time, before the
    /// engine can report completion.
    pub fn record_intent(&self, handle: NavigationHandle, kind: VisitKind) {
        self.pending.lock().insert(handle, Intent::Kind(kind));
    }

    /// Marks a navigation as one that must never be recorded as a
    /// history visit (synthetic internal redirects such as reader-mode
    /// loads).
    pub fn ignore(&self, handle: NavigationHandle) {
        self.pending.lock().insert(handle, Intent::Ignored);
    }

    /// Drops a pending intent for a navigation that was cancelled and
    /// will never resolve.
    pub fn abandon(&self, handle: NavigationHandle) {
        self.pending.lock().remove(&handle);
    }

    /// Resolves a completed navigation to the visit kind to record.
    ///
    /// Consumes the entry for `handle`. Returns `None` when the
    /// navigation was marked [`ignore`](Self::ignore)d and no visit
    /// should be recorded. A missing handle or a handle with no
    /// recorded intent defaults to [`VisitKind::Link`].
    pub fn resolve(&self, handle: Option<NavigationHandle>) -> Option<VisitKind> {
        let Some(handle) = handle else {
            return Some(VisitKind::Link);
        };
        match self.pending.lock().remove(&handle) {
            Some(Intent::Ignored) => None,
            Some(Intent::Kind(kind)) => Some(kind),
            None => Some(VisitKind::Link),
        }
    }

    /// Number of navigations awaiting resolution.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}

impl std::fmt::Debug for NavigationClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationClassifier")
            .field("pending", &self.pending_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_handle_defaults_to_link() {
        let classifier = NavigationClassifier::new();
        assert_eq!(classifier.resolve(None), Some(VisitKind::Link));
    }

    #[test]
    fn unrecorded_handle_defaults_to_link() {
        let classifier = NavigationClassifier::new();
        let handle = NavigationHandle::next();
        assert_eq!(classifier.resolve(Some(handle)), Some(VisitKind::Link));
    }

    #[test]
    fn recorded_intent_is_returned() {
        let classifier = NavigationClassifier::new();
        let handle = NavigationHandle::next();
        classifier.record_intent(handle, VisitKind::Typed);
        assert_eq!(classifier.resolve(Some(handle)), Some(VisitKind::Typed));
    }

    #[test]
    fn ignored_handle_resolves_to_none() {
        let classifier = NavigationClassifier::new();
        let handle = NavigationHandle::next();
        classifier.ignore(handle);
        assert_eq!(classifier.resolve(Some(handle)), None);
    }

    #[test]
    fn entries_are_consumed_on_resolve() {
        let classifier = NavigationClassifier::new();
        let handle = NavigationHandle::next();
        classifier.record_intent(handle, VisitKind::Typed);

        assert_eq!(classifier.resolve(Some(handle)), Some(VisitKind::Typed));
        // Second resolve sees no entry and falls back to the default.
        assert_eq!(classifier.resolve(Some(handle)), Some(VisitKind::Link));
        assert_eq!(classifier.pending_len(), 0);
    }

    #[test]
    fn abandon_drops_pending_intent() {
        let classifier = NavigationClassifier::new();
        let handle = NavigationHandle::next();
        classifier.record_intent(handle, VisitKind::Bookmark);
        classifier.abandon(handle);

        assert_eq!(classifier.pending_len(), 0);
        assert_eq!(classifier.resolve(Some(handle)), Some(VisitKind::Link));
    }
}

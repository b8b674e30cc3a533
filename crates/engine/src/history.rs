//! Engine-level back/forward list model.

use serde::{Deserialize, Serialize};
use url::Url;

/// One entry in an engine view's back/forward list.
///
/// The `token` is engine-issued and only meaningful to
/// [`EngineView::go_to_entry`](crate::EngineView::go_to_entry) on the
/// same view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackForwardEntry {
    /// Engine-issued token addressing this entry.
    pub token: u64,
    /// URL recorded for this entry.
    pub url: Url,
}

/// Snapshot of a view's back/forward list at one point in time.
///
/// `back` and `forward` are ordered nearest-first: `back[0]` is the
/// entry immediately behind `current`, `forward[0]` immediately ahead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackForwardList {
    /// Entries behind the current one, nearest first.
    pub back: Vec<BackForwardEntry>,
    /// The currently displayed entry, absent before the first commit.
    pub current: Option<BackForwardEntry>,
    /// Entries ahead of the current one, nearest first.
    pub forward: Vec<BackForwardEntry>,
}

impl BackForwardList {
    /// Returns the entry immediately behind the current one.
    pub fn nearest_back(&self) -> Option<&BackForwardEntry> {
        self.back.first()
    }

    /// Returns the entry immediately ahead of the current one.
    pub fn nearest_forward(&self) -> Option<&BackForwardEntry> {
        self.forward.first()
    }
}

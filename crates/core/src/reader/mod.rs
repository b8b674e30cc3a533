//! Reader mode: URL rewriting and the per-session helper.
//!
//! A page's reader representation is addressed by a derived internal
//! URL so the engine can treat it as ordinary navigation. The encoding
//! is deterministic and reversible (a pure function of the URL string,
//! not a lookup table): the original URL travels as a query pair on a
//! fixed internal origin.
//!
//! Entering and leaving reader mode prefers re-using an adjacent
//! back/forward entry over issuing a fresh load, so flipping reader
//! mode back and forth does not grow engine-level history. Fresh loads
//! are synthetic internal redirects and must be marked ignored in the
//! [`NavigationClassifier`] so they never surface as history visits.

mod cache;

pub use cache::{ExtractedContent, ReadabilityCache};

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tabkit_engine::{BackForwardList, LoadRequest};
use tracing::debug;
use url::Url;

use crate::classifier::NavigationClassifier;
use crate::error::{Error, Result};
use crate::session::{Session, SessionHelper};

const READER_SCHEME: &str = "reader";
const READER_HOST: &str = "local";
const READER_PATH: &str = "/page";

/// Returns the reader-representation URL for `original`.
///
/// Total: every URL has an encoding.
pub fn encode(original: &Url) -> Url {
    // The fixed origin always parses; only the query varies.
    let mut reader =
        Url::parse("reader://local/page").expect("static reader origin must parse");
    reader
        .query_pairs_mut()
        .append_pair("url", original.as_str());
    reader
}

/// Recovers the original URL from a reader URL.
///
/// Partial: returns `None` for anything not produced by [`encode`].
/// Callers must treat `None` as "not a reader URL", never as a fatal
/// condition.
pub fn decode(reader: &Url) -> Option<Url> {
    if !is_reader_url(reader) {
        return None;
    }
    let original: Cow<'_, str> = reader
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value)?;
    Url::parse(&original).ok()
}

/// Whether `url` addresses the internal reader origin.
pub fn is_reader_url(url: &Url) -> bool {
    url.scheme() == READER_SCHEME
        && url.host_str() == Some(READER_HOST)
        && url.path() == READER_PATH
}

/// How to move a view into (or out of) reader mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderTransition {
    /// Navigate in place to an existing back/forward entry, avoiding a
    /// duplicate engine history entry.
    UseHistoryEntry(u64),
    /// Issue a fresh navigation to this URL. The resulting navigation
    /// handle must be marked ignored in the classifier.
    FreshLoad(Url),
}

/// Plans the transition into reader mode for `current`.
///
/// The entries adjacent to the current one (nearest-back, then
/// nearest-forward) are checked for the reader representation before
/// falling back to a fresh load.
pub fn plan_enter(current: &Url, list: &BackForwardList) -> ReaderTransition {
    let target = encode(current);
    plan_towards(target, list)
}

/// Plans the transition out of reader mode for `current`.
///
/// Returns `None` when `current` is not a reader URL.
pub fn plan_exit(current: &Url, list: &BackForwardList) -> Option<ReaderTransition> {
    let original = decode(current)?;
    Some(plan_towards(original, list))
}

fn plan_towards(target: Url, list: &BackForwardList) -> ReaderTransition {
    for entry in [list.nearest_back(), list.nearest_forward()].into_iter().flatten() {
        if entry.url == target {
            return ReaderTransition::UseHistoryEntry(entry.token);
        }
    }
    ReaderTransition::FreshLoad(target)
}

/// Configuration for the reader-mode helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Maximum number of extraction results kept in the readability
    /// cache.
    pub cache_entries: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { cache_entries: 6 }
    }
}

/// Per-session reader-mode helper.
///
/// Attach with [`Session::add_helper`] under [`ReaderMode::NAME`];
/// recover with `session.helper(ReaderMode::NAME)` and
/// `downcast_arc::<ReaderMode>()`.
pub struct ReaderMode {
    cache: ReadabilityCache,
}

impl ReaderMode {
    /// Registry name the helper is conventionally stored under.
    pub const NAME: &'static str = "reader-mode";

    pub fn new(config: ReaderConfig) -> Self {
        Self {
            cache: ReadabilityCache::new(config.cache_entries),
        }
    }

    /// The extraction cache for this session.
    pub fn cache(&self) -> &ReadabilityCache {
        &self.cache
    }

    /// Moves `session` into reader mode.
    ///
    /// No-op when the view already displays a reader URL. A fresh load
    /// is registered as ignored with `classifier` so the internal
    /// redirect is never recorded as a visit.
    ///
    /// # Errors
    ///
    /// [`Error::NoContent`] when the session has not committed any
    /// content yet.
    pub async fn enter(&self, session: &Session, classifier: &NavigationClassifier) -> Result<()> {
        let current = session
            .displayed_url()
            .ok_or(Error::NoContent(session.id()))?;
        if is_reader_url(&current) {
            return Ok(());
        }
        let list = session.view().back_forward_list().await;
        self.apply(session, classifier, plan_enter(&current, &list))
            .await
    }

    /// Moves `session` back to the original content. No-op when the
    /// view is not displaying a reader URL.
    pub async fn exit(&self, session: &Session, classifier: &NavigationClassifier) -> Result<()> {
        let current = session
            .displayed_url()
            .ok_or(Error::NoContent(session.id()))?;
        let list = session.view().back_forward_list().await;
        match plan_exit(&current, &list) {
            Some(transition) => self.apply(session, classifier, transition).await,
            None => Ok(()),
        }
    }

    async fn apply(
        &self,
        session: &Session,
        classifier: &NavigationClassifier,
        transition: ReaderTransition,
    ) -> Result<()> {
        match transition {
            ReaderTransition::UseHistoryEntry(token) => {
                debug!(target: "tabkit.reader", session = %session.id(), token, "reusing history entry");
                session.view().go_to_entry(token).await?;
            }
            ReaderTransition::FreshLoad(url) => {
                debug!(target: "tabkit.reader", session = %session.id(), %url, "fresh reader load");
                if let Some(handle) = session.load_request(&LoadRequest::new(url)).await {
                    classifier.ignore(handle);
                }
            }
        }
        Ok(())
    }
}

impl SessionHelper for ReaderMode {
    fn name(&self) -> &'static str {
        Self::NAME
    }
}

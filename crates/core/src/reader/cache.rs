//! Best-effort cache of readability extraction results.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Content extracted from a page for reader-mode rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Article title.
    pub title: String,
    /// Author line, when the extractor found one.
    pub byline: Option<String>,
    /// Extracted article body (sanitized HTML).
    pub content: String,
}

struct CacheState {
    entries: HashMap<Url, ExtractedContent>,
    // Insertion order, oldest first; evicted when over capacity.
    order: VecDeque<Url>,
    capacity: usize,
}

/// Memoizes extraction results keyed by original URL.
///
/// Purely a performance aid for re-entering reader mode: absence is a
/// cache miss, never an error, and extraction failures simply leave no
/// entry behind.
pub struct ReadabilityCache {
    state: Mutex<CacheState>,
}

impl ReadabilityCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Stores an extraction result, evicting the oldest entry when the
    /// cache is full. Re-putting a URL refreshes its position.
    pub fn put(&self, url: Url, content: ExtractedContent) {
        let mut state = self.state.lock();
        if state.entries.insert(url.clone(), content).is_some() {
            state.order.retain(|u| u != &url);
        }
        state.order.push_back(url);
        while state.order.len() > state.capacity {
            if let Some(evicted) = state.order.pop_front() {
                state.entries.remove(&evicted);
            }
        }
    }

    /// Returns the cached result for `url`, if present.
    pub fn get(&self, url: &Url) -> Option<ExtractedContent> {
        self.state.lock().entries.get(url).cloned()
    }

    /// Drops all entries.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

impl std::fmt::Debug for ReadabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ReadabilityCache")
            .field("len", &state.entries.len())
            .field("capacity", &state.capacity)
            .finish()
    }
}

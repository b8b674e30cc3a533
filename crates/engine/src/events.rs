//! Navigation lifecycle events emitted by an engine view.

use url::Url;

use crate::handle::NavigationHandle;

/// One observation from the engine's navigation/progress stream.
///
/// Events arrive asynchronously from engine-internal threads; the
/// embedder is responsible for marshaling them onto the single context
/// that owns session state before applying them. Events for a given
/// view must be applied in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A navigation was initiated. `handle` is absent when the engine
    /// did not issue a correlation token for this navigation.
    NavigationStarted {
        handle: Option<NavigationHandle>,
        url: Url,
    },
    /// Estimated load progress changed. Engines may report
    /// non-monotonic values; only the reset at navigation start is
    /// guaranteed.
    ProgressChanged { progress: f64 },
    /// The view entered or left the loading state.
    LoadingChanged { is_loading: bool },
    /// The navigation committed and the view now displays `url`.
    NavigationCommitted { url: Url },
    /// The navigation finished loading.
    NavigationCompleted {
        handle: Option<NavigationHandle>,
        url: Url,
        title: Option<String>,
    },
    /// The navigation failed before completing.
    NavigationFailed {
        handle: Option<NavigationHandle>,
        error: String,
    },
    /// Back/forward availability changed.
    BackForwardChanged {
        can_go_back: bool,
        can_go_forward: bool,
    },
    /// The document title changed outside a navigation boundary.
    TitleChanged { title: String },
}

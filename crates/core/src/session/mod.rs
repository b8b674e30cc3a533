//! One content-loading context (a tab) and its per-session state.

mod helper;

pub mod events;
pub mod manager;
pub mod snapshot;

pub use helper::SessionHelper;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tabkit_engine::{EngineEvent, EngineView, LoadRequest, NavigationHandle};
use tracing::debug;
use url::Url;

/// Identifies one session for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab@{}", self.0)
    }
}

/// Identifies one transient notice shown on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

impl NoticeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A transient per-session notice (snackbar-style message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientNotice {
    pub id: NoticeId,
    pub message: String,
}

/// Snapshot copy of a session's navigation state.
///
/// Non-owner contexts (background persistence, UI rendering off the
/// owner sequence) must read through this copy, never through a live
/// reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The URL most recently requested. May run ahead of
    /// `displayed_url` during redirects and errors.
    pub requested_url: Option<Url>,
    /// The URL the view currently displays. `None` only before the
    /// first successful commit.
    pub displayed_url: Option<Url>,
    /// Current document title.
    pub title: Option<String>,
    /// Whether a navigation is in flight.
    pub is_loading: bool,
    /// Estimated load progress, 0.0 to 1.0. Reset to 0 at every
    /// navigation start; otherwise applied in arrival order and not
    /// required to be monotonic.
    pub progress: f64,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// One tab: a content-loading context wrapping a single engine view.
///
/// Sessions are owned exclusively by the
/// [`SessionManager`](manager::SessionManager); UI layers should hold
/// weak references and treat the manager as the source of truth for
/// lifetime.
pub struct Session {
    id: SessionId,
    view: Arc<dyn EngineView>,
    state: Mutex<SessionState>,
    notices: Mutex<Vec<TransientNotice>>,
    helpers: Mutex<HashMap<String, Arc<dyn SessionHelper>>>,
}

impl Session {
    pub(crate) fn new(id: SessionId, view: Arc<dyn EngineView>) -> Self {
        Self {
            id,
            view,
            state: Mutex::new(SessionState::default()),
            notices: Mutex::new(Vec::new()),
            helpers: Mutex::new(HashMap::new()),
        }
    }

    /// This session's stable id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The engine view this session owns.
    pub fn view(&self) -> &Arc<dyn EngineView> {
        &self.view
    }

    /// Starts a navigation.
    ///
    /// Returns `None` when the engine rejects the request
    /// synchronously; the caller must not record a visit intent for a
    /// rejected request. Starting a new load implicitly cancels any
    /// prior in-flight navigation on this session.
    pub async fn load_request(&self, request: &LoadRequest) -> Option<NavigationHandle> {
        match self.view.load_request(request).await {
            Ok(Some(handle)) => {
                let mut state = self.state.lock();
                state.requested_url = Some(request.url.clone());
                Some(handle)
            }
            Ok(None) => {
                debug!(target: "tabkit.session", session = %self.id, url = %request.url, "engine rejected load request");
                None
            }
            Err(err) => {
                debug!(target: "tabkit.session", session = %self.id, url = %request.url, error = %err, "load request failed");
                None
            }
        }
    }

    /// Reloads the current content.
    pub async fn reload(&self) {
        if let Err(err) = self.view.reload().await {
            debug!(target: "tabkit.session", session = %self.id, error = %err, "reload failed");
        }
    }

    /// Stops the in-flight navigation, if any.
    pub async fn stop(&self) {
        if let Err(err) = self.view.stop().await {
            debug!(target: "tabkit.session", session = %self.id, error = %err, "stop failed");
        }
    }

    /// Navigates back. No-op when the capability flag is false.
    pub async fn go_back(&self) {
        if !self.can_go_back() {
            return;
        }
        if let Err(err) = self.view.go_back().await {
            debug!(target: "tabkit.session", session = %self.id, error = %err, "go_back failed");
        }
    }

    /// Navigates forward. No-op when the capability flag is false.
    pub async fn go_forward(&self) {
        if !self.can_go_forward() {
            return;
        }
        if let Err(err) = self.view.go_forward().await {
            debug!(target: "tabkit.session", session = %self.id, error = %err, "go_forward failed");
        }
    }

    /// Applies one engine event to this session's state.
    ///
    /// Events must be applied in arrival order; the manager takes care
    /// of this when events are routed through
    /// [`handle_engine_event`](manager::SessionManager::handle_engine_event).
    pub fn apply_engine_event(&self, event: &EngineEvent) {
        let mut state = self.state.lock();
        match event {
            EngineEvent::NavigationStarted { url, .. } => {
                state.requested_url = Some(url.clone());
                state.is_loading = true;
                state.progress = 0.0;
            }
            EngineEvent::ProgressChanged { progress } => {
                state.progress = progress.clamp(0.0, 1.0);
            }
            EngineEvent::LoadingChanged { is_loading } => {
                state.is_loading = *is_loading;
            }
            EngineEvent::NavigationCommitted { url } => {
                state.displayed_url = Some(url.clone());
            }
            EngineEvent::NavigationCompleted { url, title, .. } => {
                state.displayed_url = Some(url.clone());
                if title.is_some() {
                    state.title = title.clone();
                }
                state.is_loading = false;
            }
            EngineEvent::NavigationFailed { error, .. } => {
                debug!(target: "tabkit.session", session = %self.id, error = %error, "navigation failed");
                state.is_loading = false;
            }
            EngineEvent::BackForwardChanged {
                can_go_back,
                can_go_forward,
            } => {
                state.can_go_back = *can_go_back;
                state.can_go_forward = *can_go_forward;
            }
            EngineEvent::TitleChanged { title } => {
                state.title = Some(title.clone());
            }
        }
    }

    /// Returns a snapshot copy of the navigation state.
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn requested_url(&self) -> Option<Url> {
        self.state.lock().requested_url.clone()
    }

    pub fn displayed_url(&self) -> Option<Url> {
        self.state.lock().displayed_url.clone()
    }

    pub fn title(&self) -> Option<String> {
        self.state.lock().title.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    pub fn progress(&self) -> f64 {
        self.state.lock().progress
    }

    pub fn can_go_back(&self) -> bool {
        self.state.lock().can_go_back
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.lock().can_go_forward
    }

    /// Shows a transient notice on this session and returns its id.
    pub fn show_notice(&self, message: impl Into<String>) -> NoticeId {
        let notice = TransientNotice {
            id: NoticeId::next(),
            message: message.into(),
        };
        let id = notice.id;
        self.notices.lock().push(notice);
        id
    }

    /// Dismisses a notice. Returns false when the id is not active.
    pub fn dismiss_notice(&self, id: NoticeId) -> bool {
        let mut notices = self.notices.lock();
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    /// Returns the active notices in display order.
    pub fn notices(&self) -> Vec<TransientNotice> {
        self.notices.lock().clone()
    }

    /// Attaches a helper under `name`, replacing any prior instance.
    ///
    /// Replacement does not tear the prior helper down; that is the
    /// caller's responsibility.
    pub fn add_helper(&self, name: impl Into<String>, helper: Arc<dyn SessionHelper>) {
        self.helpers.lock().insert(name.into(), helper);
    }

    /// Returns the helper registered under `name`, if any.
    pub fn helper(&self, name: &str) -> Option<Arc<dyn SessionHelper>> {
        self.helpers.lock().get(name).cloned()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("displayed_url", &state.displayed_url)
            .field("is_loading", &state.is_loading)
            .finish()
    }
}

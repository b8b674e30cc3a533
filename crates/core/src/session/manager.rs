//! Ordered session collection, selection tracking, and event fan-out.

use std::sync::Arc;
use std::sync::Weak;

use parking_lot::Mutex;
use tabkit_engine::{Engine, EngineEvent, EngineViewHandle, LoadRequest, NavigationHandle};
use tracing::debug;
use url::Url;

use super::events::{ListenerId, SessionEventListener};
use super::snapshot::{SessionSnapshot, TRAY_SNAPSHOT_SCHEMA_VERSION, TraySnapshot};
use super::{Session, SessionId};
use crate::error::{Error, Result};

/// A navigation the engine reported complete, surfaced for visit
/// classification.
#[derive(Debug, Clone)]
pub struct CompletedNavigation {
    /// The session whose view completed the navigation.
    pub session: SessionId,
    /// Correlation token, absent when the engine did not supply one.
    pub handle: Option<NavigationHandle>,
    /// Final URL of the navigation.
    pub url: Url,
    /// Document title at completion, when known.
    pub title: Option<String>,
}

struct ListenerEntry {
    id: ListenerId,
    listener: Weak<dyn SessionEventListener>,
}

#[derive(Default)]
struct ManagerState {
    sessions: Vec<Arc<Session>>,
    selected: Option<SessionId>,
    shut_down: bool,
}

/// Owns the ordered collection of sessions and the selection.
///
/// Insertion order is the tray display order and stays stable across
/// selection changes. All mutation is serialized behind one mutex;
/// listener callbacks are invoked after it is released, so listeners
/// may re-enter the manager.
///
/// Invariants, checked by the test suite after every mutation:
/// the selected id, when set, always names a live session; an empty
/// sequence means no selection.
pub struct SessionManager {
    engine: Arc<dyn Engine>,
    state: Mutex<ManagerState>,
    listeners: Mutex<Vec<ListenerEntry>>,
}

impl SessionManager {
    /// Creates a manager that allocates content views from `engine`.
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            state: Mutex::new(ManagerState::default()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Creates a new session, appended at the end of the tray order.
    ///
    /// The new session is NOT auto-selected. Listeners receive
    /// `session_created` followed by `session_added` with the insertion
    /// index. When `initial_request` is given the load is started; a
    /// synchronous engine rejection leaves the session blank rather
    /// than failing creation.
    ///
    /// # Errors
    ///
    /// [`Error::ManagerShutDown`] after [`shutdown`](Self::shutdown);
    /// [`Error::Engine`] when the engine cannot allocate a view.
    pub async fn create_session(&self, initial_request: Option<LoadRequest>) -> Result<SessionId> {
        if self.state.lock().shut_down {
            return Err(Error::ManagerShutDown);
        }

        let view = self.engine.create_view().await?;
        let session = Arc::new(Session::new(SessionId::next(), view));
        let id = session.id();

        let index = {
            let mut state = self.state.lock();
            if state.shut_down {
                // Raced with shutdown; the view must not leak.
                drop(state);
                session.view().release().await;
                return Err(Error::ManagerShutDown);
            }
            state.sessions.push(session.clone());
            state.sessions.len() - 1
        };

        debug!(target: "tabkit.session", session = %id, index, "session created");
        for listener in self.live_listeners() {
            listener.session_created(&session);
        }
        for listener in self.live_listeners() {
            listener.session_added(&session, index);
        }

        if let Some(request) = initial_request {
            session.load_request(&request).await;
        }

        Ok(id)
    }

    /// Selects `id`. Idempotent: selecting the current selection fires
    /// no notifications. Otherwise listeners receive
    /// `session_deselected` then `session_selected`, both carrying the
    /// previous and next session; the new selection is observable
    /// before this returns.
    pub fn select_session(&self, id: SessionId) -> Result<()> {
        let (previous, next) = {
            let mut state = self.state.lock();
            if state.selected == Some(id) {
                return Ok(());
            }
            let next = state
                .sessions
                .iter()
                .find(|s| s.id() == id)
                .cloned()
                .ok_or(Error::SessionNotFound(id))?;
            let previous = state
                .selected
                .and_then(|prev| state.sessions.iter().find(|s| s.id() == prev).cloned());
            state.selected = Some(id);
            (previous, next)
        };

        debug!(
            target: "tabkit.session",
            previous = previous.as_ref().map(|s| s.id().to_string()),
            next = %id,
            "selection changed"
        );
        for listener in self.live_listeners() {
            listener.session_deselected(previous.as_ref(), Some(&next));
        }
        for listener in self.live_listeners() {
            listener.session_selected(previous.as_ref(), Some(&next));
        }
        Ok(())
    }

    /// Removes `id` from the tray.
    ///
    /// The engine view is released strictly before the session leaves
    /// the sequence, so late engine callbacks can still be resolved
    /// (and dropped) while teardown is in flight. If the removed
    /// session was selected, selection moves to the session now at the
    /// same index, else the previous one, else none; the selection
    /// change pair fires before `session_removed` with the prior index.
    pub async fn remove_session(&self, id: SessionId) -> Result<()> {
        let session = self
            .session(id)
            .ok_or(Error::SessionNotFound(id))?;

        // Engine-side teardown first; the session is still resolvable
        // via session_for_engine_handle until it leaves the sequence.
        session.view().release().await;

        let (prior_index, selection_change) = {
            let mut state = self.state.lock();
            let Some(index) = state.sessions.iter().position(|s| s.id() == id) else {
                // Lost a removal race; the other caller notified.
                return Ok(());
            };
            state.sessions.remove(index);

            let selection_change = if state.selected == Some(id) {
                let next = state
                    .sessions
                    .get(index)
                    .or_else(|| index.checked_sub(1).and_then(|i| state.sessions.get(i)))
                    .cloned();
                state.selected = next.as_ref().map(|s| s.id());
                Some(next)
            } else {
                None
            };
            (index, selection_change)
        };

        debug!(target: "tabkit.session", session = %id, prior_index, "session removed");
        if let Some(next) = selection_change {
            for listener in self.live_listeners() {
                listener.session_deselected(Some(&session), next.as_ref());
            }
            for listener in self.live_listeners() {
                listener.session_selected(Some(&session), next.as_ref());
            }
        }
        for listener in self.live_listeners() {
            listener.session_removed(&session, prior_index);
        }
        Ok(())
    }

    /// Returns the session with the given id, if live.
    pub fn session(&self, id: SessionId) -> Option<Arc<Session>> {
        self.state
            .lock()
            .sessions
            .iter()
            .find(|s| s.id() == id)
            .cloned()
    }

    /// Reverse lookup from an engine view handle to its owning session.
    ///
    /// Returns `None` for handles no longer (or never) owned; callers
    /// must tolerate this race and drop the stale callback.
    pub fn session_for_engine_handle(&self, handle: EngineViewHandle) -> Option<Arc<Session>> {
        self.state
            .lock()
            .sessions
            .iter()
            .find(|s| s.view().handle() == handle)
            .cloned()
    }

    /// Ordered snapshot of the tray.
    pub fn sessions(&self) -> Vec<Arc<Session>> {
        self.state.lock().sessions.clone()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.state.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().sessions.is_empty()
    }

    /// Id of the selected session, if any.
    pub fn selected_id(&self) -> Option<SessionId> {
        self.state.lock().selected
    }

    /// The selected session, if any.
    pub fn selected_session(&self) -> Option<Arc<Session>> {
        let state = self.state.lock();
        state
            .selected
            .and_then(|id| state.sessions.iter().find(|s| s.id() == id).cloned())
    }

    /// Registers a listener and returns its id.
    ///
    /// Only a weak reference is retained; the caller keeps the
    /// listener alive for as long as it wants deliveries.
    pub fn add_listener<L>(&self, listener: &Arc<L>) -> ListenerId
    where
        L: SessionEventListener + 'static,
    {
        let id = ListenerId::next();
        let weak: Weak<dyn SessionEventListener> = Arc::downgrade(listener) as _;
        self.listeners.lock().push(ListenerEntry { id, listener: weak });
        id
    }

    /// Unregisters a listener. Returns false when the id is unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    /// Routes one engine callback to the session owning `view`.
    ///
    /// Stale handles (the session was removed between the engine
    /// raising the event and us receiving it) are dropped with a debug
    /// log. Returns the completed navigation, if this event was one,
    /// for visit classification.
    pub fn handle_engine_event(
        &self,
        view: EngineViewHandle,
        event: EngineEvent,
    ) -> Option<CompletedNavigation> {
        let Some(session) = self.session_for_engine_handle(view) else {
            debug!(target: "tabkit.session", %view, "dropping engine event for unknown view");
            return None;
        };
        session.apply_engine_event(&event);

        match event {
            EngineEvent::NavigationCompleted { handle, url, title } => Some(CompletedNavigation {
                session: session.id(),
                handle,
                url,
                title,
            }),
            _ => None,
        }
    }

    /// Serializes tray order, per-session URL, and selection.
    pub fn snapshot(&self) -> TraySnapshot {
        let state = self.state.lock();
        let sessions = state
            .sessions
            .iter()
            .map(|s| SessionSnapshot {
                url: s.displayed_url().or_else(|| s.requested_url()),
            })
            .collect();
        let selected = state
            .selected
            .and_then(|id| state.sessions.iter().position(|s| s.id() == id));
        TraySnapshot {
            schema_version: TRAY_SNAPSHOT_SCHEMA_VERSION,
            sessions,
            selected,
        }
    }

    /// Recreates sessions from `snapshot` in order and restores the
    /// selection. Returns the new ids in tray order.
    pub async fn restore(&self, snapshot: &TraySnapshot) -> Result<Vec<SessionId>> {
        if snapshot.schema_version != TRAY_SNAPSHOT_SCHEMA_VERSION {
            return Err(Error::SnapshotSchema(snapshot.schema_version));
        }
        let mut ids = Vec::with_capacity(snapshot.sessions.len());
        for entry in &snapshot.sessions {
            let request = entry.url.clone().map(LoadRequest::new);
            ids.push(self.create_session(request).await?);
        }
        if let Some(index) = snapshot.selected {
            if let Some(id) = ids.get(index) {
                self.select_session(*id)?;
            }
        }
        Ok(ids)
    }

    /// Tears the manager down: releases every engine view, clears the
    /// tray and selection, and makes future `create_session` calls
    /// fail.
    pub async fn shutdown(&self) {
        let sessions = {
            let mut state = self.state.lock();
            state.shut_down = true;
            state.selected = None;
            std::mem::take(&mut state.sessions)
        };
        debug!(target: "tabkit.session", count = sessions.len(), "manager shutting down");
        for session in sessions {
            session.view().release().await;
        }
    }

    /// Upgrades live listeners in registration order, pruning dead
    /// entries. Called with no state lock held.
    fn live_listeners(&self) -> Vec<Arc<dyn SessionEventListener>> {
        let mut listeners = self.listeners.lock();
        listeners.retain(|entry| entry.listener.strong_count() > 0);
        listeners
            .iter()
            .filter_map(|entry| entry.listener.upgrade())
            .collect()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SessionManager")
            .field("sessions", &state.sessions.len())
            .field("selected", &state.selected)
            .field("shut_down", &state.shut_down)
            .finish()
    }
}

//! Test doubles for the engine and persistence boundaries.
//!
//! These fakes let embedders (and this crate's own test suite) drive
//! the full session lifecycle without a real web engine: the fake view
//! records every command it receives, load rejections can be scripted,
//! and engine events are injected by calling
//! [`SessionManager::handle_engine_event`] or
//! [`VisitPipeline::handle_event`] directly.
//!
//! [`SessionManager::handle_engine_event`]: crate::SessionManager::handle_engine_event
//! [`VisitPipeline::handle_event`]: crate::VisitPipeline::handle_event

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tabkit_engine::{
    BackForwardList, Engine, EngineView, EngineViewHandle, Error as EngineError, LoadRequest,
    NavigationHandle, Result as EngineResult,
};
use url::Url;

use crate::classifier::VisitKind;
use crate::persistence::{HistoryStore, StoreError};
use crate::session::Session;
use crate::session::events::SessionEventListener;

/// A command a [`FakeEngineView`] received, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    Load(Url),
    Reload,
    Stop,
    GoBack,
    GoForward,
    GoToEntry(u64),
    Release,
}

/// In-memory engine view that records commands instead of loading
/// anything.
pub struct FakeEngineView {
    handle: EngineViewHandle,
    commands: Mutex<Vec<ViewCommand>>,
    back_forward: Mutex<BackForwardList>,
    reject_next_load: AtomicBool,
    released: AtomicBool,
}

impl FakeEngineView {
    pub fn new() -> Self {
        Self {
            handle: EngineViewHandle::next(),
            commands: Mutex::new(Vec::new()),
            back_forward: Mutex::new(BackForwardList::default()),
            reject_next_load: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }

    /// Makes the next `load_request` return `Ok(None)` (synchronous
    /// engine rejection).
    pub fn reject_next_load(&self) {
        self.reject_next_load.store(true, Ordering::SeqCst);
    }

    /// Replaces the back/forward list the view reports.
    pub fn set_back_forward_list(&self, list: BackForwardList) {
        *self.back_forward.lock() = list;
    }

    /// Commands received so far, in call order.
    pub fn commands(&self) -> Vec<ViewCommand> {
        self.commands.lock().clone()
    }

    /// URL of the most recent load command, if any.
    pub fn last_load(&self) -> Option<Url> {
        self.commands
            .lock()
            .iter()
            .rev()
            .find_map(|command| match command {
                ViewCommand::Load(url) => Some(url.clone()),
                _ => None,
            })
    }

    /// Whether `release` has been called.
    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn record(&self, command: ViewCommand) -> EngineResult<()> {
        if self.released() {
            return Err(EngineError::ViewReleased);
        }
        self.commands.lock().push(command);
        Ok(())
    }
}

impl Default for FakeEngineView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineView for FakeEngineView {
    fn handle(&self) -> EngineViewHandle {
        self.handle
    }

    async fn load_request(&self, request: &LoadRequest) -> EngineResult<Option<NavigationHandle>> {
        if self.released() {
            return Err(EngineError::ViewReleased);
        }
        if self.reject_next_load.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.record(ViewCommand::Load(request.url.clone()))?;
        Ok(Some(NavigationHandle::next()))
    }

    async fn reload(&self) -> EngineResult<()> {
        self.record(ViewCommand::Reload)
    }

    async fn stop(&self) -> EngineResult<()> {
        self.record(ViewCommand::Stop)
    }

    async fn go_back(&self) -> EngineResult<()> {
        self.record(ViewCommand::GoBack)
    }

    async fn go_forward(&self) -> EngineResult<()> {
        self.record(ViewCommand::GoForward)
    }

    async fn go_to_entry(&self, token: u64) -> EngineResult<()> {
        self.record(ViewCommand::GoToEntry(token))
    }

    async fn back_forward_list(&self) -> BackForwardList {
        self.back_forward.lock().clone()
    }

    async fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.commands.lock().push(ViewCommand::Release);
        }
    }
}

/// Engine that hands out [`FakeEngineView`]s and remembers them.
#[derive(Default)]
pub struct FakeEngine {
    views: Mutex<Vec<Arc<FakeEngineView>>>,
    fail_next_create: AtomicBool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create_view` fail.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// All views handed out so far, in creation order.
    pub fn views(&self) -> Vec<Arc<FakeEngineView>> {
        self.views.lock().clone()
    }

    /// The view with the given handle, if this engine created it.
    pub fn view(&self, handle: EngineViewHandle) -> Option<Arc<FakeEngineView>> {
        self.views
            .lock()
            .iter()
            .find(|view| view.handle() == handle)
            .cloned()
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn create_view(&self) -> EngineResult<Arc<dyn EngineView>> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(EngineError::ViewCreation("scripted failure".to_string()));
        }
        let view = Arc::new(FakeEngineView::new());
        self.views.lock().push(view.clone());
        Ok(view)
    }
}

/// One session lifecycle event observed by a [`RecordingListener`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Created(crate::session::SessionId),
    Added(crate::session::SessionId, usize),
    Deselected {
        previous: Option<crate::session::SessionId>,
        next: Option<crate::session::SessionId>,
    },
    Selected {
        previous: Option<crate::session::SessionId>,
        next: Option<crate::session::SessionId>,
    },
    Removed(crate::session::SessionId, usize),
}

/// Listener that records every event it receives, in delivery order.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events delivered so far.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Drops recorded events, keeping the listener registered.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SessionEventListener for RecordingListener {
    fn session_created(&self, session: &Arc<Session>) {
        self.events
            .lock()
            .push(RecordedEvent::Created(session.id()));
    }

    fn session_added(&self, session: &Arc<Session>, index: usize) {
        self.events
            .lock()
            .push(RecordedEvent::Added(session.id(), index));
    }

    fn session_deselected(&self, previous: Option<&Arc<Session>>, next: Option<&Arc<Session>>) {
        self.events.lock().push(RecordedEvent::Deselected {
            previous: previous.map(|s| s.id()),
            next: next.map(|s| s.id()),
        });
    }

    fn session_selected(&self, previous: Option<&Arc<Session>>, next: Option<&Arc<Session>>) {
        self.events.lock().push(RecordedEvent::Selected {
            previous: previous.map(|s| s.id()),
            next: next.map(|s| s.id()),
        });
    }

    fn session_removed(&self, session: &Arc<Session>, prior_index: usize) {
        self.events
            .lock()
            .push(RecordedEvent::Removed(session.id(), prior_index));
    }
}

/// In-memory history store for asserting recorded visits.
#[derive(Default)]
pub struct MemoryHistory {
    visits: Mutex<Vec<(Url, Option<String>, VisitKind)>>,
    fail_writes: AtomicBool,
}

impl MemoryHistory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Visits recorded so far, in write order.
    pub fn visits(&self) -> Vec<(Url, Option<String>, VisitKind)> {
        self.visits.lock().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn record_visit(
        &self,
        url: &Url,
        title: Option<&str>,
        kind: VisitKind,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("scripted failure".to_string()));
        }
        self.visits
            .lock()
            .push((url.clone(), title.map(str::to_string), kind));
        Ok(())
    }
}

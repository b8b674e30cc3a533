//! End-to-end session lifecycle: creation, selection, removal, and
//! listener fan-out ordering against the fake engine.

use std::sync::Arc;

use tabkit::testing::{FakeEngine, RecordedEvent, RecordingListener, ViewCommand};
use tabkit::{SessionEventListener, SessionHelper, SessionManager};
use tabkit_engine::{EngineEvent, LoadRequest};
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[tokio::test]
async fn creation_fires_created_then_added() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let listener = RecordingListener::new();
    manager.add_listener(&listener);

    let id = manager.create_session(None).await.unwrap();

    assert_eq!(
        listener.events(),
        vec![RecordedEvent::Created(id), RecordedEvent::Added(id, 0)]
    );
}

#[tokio::test]
async fn selection_fires_deselected_then_selected() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let a = manager.create_session(None).await.unwrap();
    let b = manager.create_session(None).await.unwrap();

    let listener = RecordingListener::new();
    manager.add_listener(&listener);

    manager.select_session(a).unwrap();
    manager.select_session(b).unwrap();

    assert_eq!(
        listener.events(),
        vec![
            RecordedEvent::Deselected {
                previous: None,
                next: Some(a)
            },
            RecordedEvent::Selected {
                previous: None,
                next: Some(a)
            },
            RecordedEvent::Deselected {
                previous: Some(a),
                next: Some(b)
            },
            RecordedEvent::Selected {
                previous: Some(a),
                next: Some(b)
            },
        ]
    );
}

#[tokio::test]
async fn reselecting_current_selection_fires_nothing() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let a = manager.create_session(None).await.unwrap();
    manager.select_session(a).unwrap();

    let listener = RecordingListener::new();
    manager.add_listener(&listener);
    manager.select_session(a).unwrap();

    assert!(listener.events().is_empty());
}

/// Listeners observe the new selection from within the callback.
#[tokio::test]
async fn selection_is_observable_during_callbacks() {
    struct Checker {
        manager: std::sync::Weak<SessionManager>,
        observed: parking_lot::Mutex<Vec<Option<tabkit::SessionId>>>,
    }
    impl SessionEventListener for Checker {
        fn session_selected(
            &self,
            _previous: Option<&Arc<tabkit::Session>>,
            _next: Option<&Arc<tabkit::Session>>,
        ) {
            if let Some(manager) = self.manager.upgrade() {
                self.observed.lock().push(manager.selected_id());
            }
        }
    }

    let manager = Arc::new(SessionManager::new(Arc::new(FakeEngine::new())));
    let a = manager.create_session(None).await.unwrap();

    let checker = Arc::new(Checker {
        manager: Arc::downgrade(&manager),
        observed: parking_lot::Mutex::new(Vec::new()),
    });
    manager.add_listener(&checker);

    manager.select_session(a).unwrap();
    assert_eq!(checker.observed.lock().clone(), vec![Some(a)]);
}

#[tokio::test]
async fn removal_releases_view_before_dropping_session() {
    let engine = Arc::new(FakeEngine::new());
    let manager = SessionManager::new(engine.clone());
    let id = manager.create_session(None).await.unwrap();
    let view_handle = manager.session(id).unwrap().view().handle();
    let view = engine.view(view_handle).unwrap();

    let listener = RecordingListener::new();
    manager.add_listener(&listener);

    manager.remove_session(id).await.unwrap();

    assert!(view.released());
    assert!(manager.session_for_engine_handle(view_handle).is_none());
    assert_eq!(listener.events(), vec![RecordedEvent::Removed(id, 0)]);
}

#[tokio::test]
async fn removing_selected_fires_selection_pair_before_removal() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let a = manager.create_session(None).await.unwrap();
    let b = manager.create_session(None).await.unwrap();
    manager.select_session(a).unwrap();

    let listener = RecordingListener::new();
    manager.add_listener(&listener);

    manager.remove_session(a).await.unwrap();

    assert_eq!(
        listener.events(),
        vec![
            RecordedEvent::Deselected {
                previous: Some(a),
                next: Some(b)
            },
            RecordedEvent::Selected {
                previous: Some(a),
                next: Some(b)
            },
            RecordedEvent::Removed(a, 0),
        ]
    );
    assert_eq!(manager.selected_id(), Some(b));
}

#[tokio::test]
async fn dropped_listener_stops_receiving_events() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let listener = RecordingListener::new();
    let id = manager.add_listener(&listener);

    manager.create_session(None).await.unwrap();
    assert_eq!(listener.events().len(), 2);

    assert!(manager.remove_listener(id));
    manager.create_session(None).await.unwrap();
    assert_eq!(listener.events().len(), 2);
}

#[tokio::test]
async fn rejected_initial_load_leaves_blank_session() {
    let engine = Arc::new(FakeEngine::new());
    let manager = SessionManager::new(engine.clone());

    let id = manager.create_session(None).await.unwrap();
    let session = manager.session(id).unwrap();
    let view = engine.view(session.view().handle()).unwrap();

    view.reject_next_load();
    let handle = session
        .load_request(&LoadRequest::new(url("https://example.com/")))
        .await;

    assert!(handle.is_none());
    assert!(session.requested_url().is_none());
    assert!(session.displayed_url().is_none());
}

#[tokio::test]
async fn engine_events_drive_session_state() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let id = manager.create_session(None).await.unwrap();
    let session = manager.session(id).unwrap();
    let view = session.view().handle();

    let target = url("https://example.com/");
    manager.handle_engine_event(
        view,
        EngineEvent::NavigationStarted {
            handle: None,
            url: target.clone(),
        },
    );
    assert!(session.is_loading());
    assert_eq!(session.progress(), 0.0);
    // Displayed URL lags the request until the commit.
    assert_eq!(session.requested_url(), Some(target.clone()));
    assert_eq!(session.displayed_url(), None);

    manager.handle_engine_event(view, EngineEvent::ProgressChanged { progress: 0.7 });
    // Engines may report non-monotonic progress; it is applied as-is.
    manager.handle_engine_event(view, EngineEvent::ProgressChanged { progress: 0.4 });
    assert_eq!(session.progress(), 0.4);

    manager.handle_engine_event(
        view,
        EngineEvent::NavigationCommitted {
            url: target.clone(),
        },
    );
    assert_eq!(session.displayed_url(), Some(target.clone()));

    manager.handle_engine_event(
        view,
        EngineEvent::NavigationCompleted {
            handle: None,
            url: target.clone(),
            title: Some("Example".to_string()),
        },
    );
    assert!(!session.is_loading());
    assert_eq!(session.title(), Some("Example".to_string()));

    // A new navigation resets progress.
    manager.handle_engine_event(
        view,
        EngineEvent::NavigationStarted {
            handle: None,
            url: url("https://example.com/next"),
        },
    );
    assert_eq!(session.progress(), 0.0);
}

#[tokio::test]
async fn back_forward_capability_gates_history_moves() {
    let engine = Arc::new(FakeEngine::new());
    let manager = SessionManager::new(engine.clone());
    let id = manager.create_session(None).await.unwrap();
    let session = manager.session(id).unwrap();
    let view = engine.view(session.view().handle()).unwrap();

    // Flags default to false: both moves are no-ops.
    session.go_back().await;
    session.go_forward().await;
    assert!(view.commands().is_empty());

    manager.handle_engine_event(
        session.view().handle(),
        EngineEvent::BackForwardChanged {
            can_go_back: true,
            can_go_forward: false,
        },
    );
    session.go_back().await;
    session.go_forward().await;
    assert_eq!(view.commands(), vec![ViewCommand::GoBack]);
}

struct Marker(u32);
impl SessionHelper for Marker {
    fn name(&self) -> &'static str {
        "marker"
    }
}

#[tokio::test]
async fn helper_registry_replaces_on_same_name() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let id = manager.create_session(None).await.unwrap();
    let session = manager.session(id).unwrap();

    session.add_helper("marker", Arc::new(Marker(1)));
    let first = session
        .helper("marker")
        .unwrap()
        .downcast_arc::<Marker>()
        .ok()
        .unwrap();
    assert_eq!(first.0, 1);

    session.add_helper("marker", Arc::new(Marker(2)));
    let second = session
        .helper("marker")
        .unwrap()
        .downcast_arc::<Marker>()
        .ok()
        .unwrap();
    assert_eq!(second.0, 2);

    assert!(session.helper("unknown").is_none());
}

#[tokio::test]
async fn transient_notices_keep_display_order() {
    let manager = SessionManager::new(Arc::new(FakeEngine::new()));
    let id = manager.create_session(None).await.unwrap();
    let session = manager.session(id).unwrap();

    let first = session.show_notice("download complete");
    let second = session.show_notice("page saved to reading list");

    let notices = session.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].id, first);
    assert_eq!(notices[1].id, second);

    assert!(session.dismiss_notice(first));
    assert!(!session.dismiss_notice(first));
    assert_eq!(session.notices().len(), 1);
}

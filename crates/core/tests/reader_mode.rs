//! Reader-mode transitions against the fake engine: fresh loads,
//! history-entry reuse, and the classifier ignore contract.

use std::sync::Arc;

use tabkit::reader;
use tabkit_engine::EngineView;
use tabkit::testing::{FakeEngine, FakeEngineView, ViewCommand};
use tabkit::{
    Error, ExtractedContent, NavigationClassifier, ReaderConfig, ReaderMode, Session,
    SessionManager,
};
use tabkit_engine::{BackForwardEntry, BackForwardList, EngineEvent};
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

struct Harness {
    manager: SessionManager,
    session: Arc<Session>,
    view: Arc<FakeEngineView>,
    reader: ReaderMode,
    classifier: NavigationClassifier,
}

async fn harness() -> Harness {
    let engine = Arc::new(FakeEngine::new());
    let manager = SessionManager::new(engine.clone());
    let id = manager.create_session(None).await.unwrap();
    let session = manager.session(id).unwrap();
    let view = engine.view(session.view().handle()).unwrap();
    Harness {
        manager,
        session,
        view,
        reader: ReaderMode::new(ReaderConfig::default()),
        classifier: NavigationClassifier::new(),
    }
}

impl Harness {
    /// Drives the session to a committed display of `target`.
    fn commit(&self, target: &Url) {
        self.manager.handle_engine_event(
            self.view.handle(),
            EngineEvent::NavigationCommitted {
                url: target.clone(),
            },
        );
    }
}

#[tokio::test]
async fn enter_without_content_fails() {
    let h = harness().await;
    assert!(matches!(
        h.reader.enter(&h.session, &h.classifier).await,
        Err(Error::NoContent(_))
    ));
}

#[tokio::test]
async fn enter_issues_fresh_load_marked_ignored() {
    let h = harness().await;
    let article = url("https://example.com/article");
    h.commit(&article);

    h.reader.enter(&h.session, &h.classifier).await.unwrap();

    assert_eq!(h.view.last_load(), Some(reader::encode(&article)));
    // The synthetic load must resolve to no history visit.
    assert_eq!(h.classifier.pending_len(), 1);
}

#[tokio::test]
async fn enter_reuses_adjacent_back_entry() {
    let h = harness().await;
    let article = url("https://example.com/article");
    let reader_url = reader::encode(&article);
    h.commit(&article);

    h.view.set_back_forward_list(BackForwardList {
        back: vec![BackForwardEntry {
            token: 11,
            url: reader_url,
        }],
        current: Some(BackForwardEntry {
            token: 12,
            url: article.clone(),
        }),
        forward: vec![],
    });

    h.reader.enter(&h.session, &h.classifier).await.unwrap();

    assert_eq!(h.view.commands(), vec![ViewCommand::GoToEntry(11)]);
    assert_eq!(h.classifier.pending_len(), 0);
}

#[tokio::test]
async fn enter_is_a_noop_when_already_in_reader_mode() {
    let h = harness().await;
    let reader_url = reader::encode(&url("https://example.com/article"));
    h.commit(&reader_url);

    h.reader.enter(&h.session, &h.classifier).await.unwrap();
    assert!(h.view.commands().is_empty());
}

#[tokio::test]
async fn exit_reuses_adjacent_original_entry() {
    let h = harness().await;
    let article = url("https://example.com/article");
    let reader_url = reader::encode(&article);
    h.commit(&reader_url);

    h.view.set_back_forward_list(BackForwardList {
        back: vec![BackForwardEntry {
            token: 21,
            url: article.clone(),
        }],
        current: Some(BackForwardEntry {
            token: 22,
            url: reader_url,
        }),
        forward: vec![],
    });

    h.reader.exit(&h.session, &h.classifier).await.unwrap();
    assert_eq!(h.view.commands(), vec![ViewCommand::GoToEntry(21)]);
}

#[tokio::test]
async fn exit_falls_back_to_loading_the_original() {
    let h = harness().await;
    let article = url("https://example.com/article");
    h.commit(&reader::encode(&article));

    h.reader.exit(&h.session, &h.classifier).await.unwrap();

    assert_eq!(h.view.last_load(), Some(article));
    assert_eq!(h.classifier.pending_len(), 1);
}

#[tokio::test]
async fn exit_is_a_noop_outside_reader_mode() {
    let h = harness().await;
    h.commit(&url("https://example.com/article"));

    h.reader.exit(&h.session, &h.classifier).await.unwrap();
    assert!(h.view.commands().is_empty());
}

#[tokio::test]
async fn helper_is_recoverable_from_the_session_registry() {
    let h = harness().await;
    let article = url("https://example.com/article");

    let helper = Arc::new(ReaderMode::new(ReaderConfig { cache_entries: 2 }));
    helper.cache().put(
        article.clone(),
        ExtractedContent {
            title: "Article".to_string(),
            byline: None,
            content: "<p>body</p>".to_string(),
        },
    );
    h.session.add_helper(ReaderMode::NAME, helper);

    let recovered = h
        .session
        .helper(ReaderMode::NAME)
        .unwrap()
        .downcast_arc::<ReaderMode>()
        .ok()
        .unwrap();
    assert!(recovered.cache().get(&article).is_some());
}

//! Engine-event-to-history-visit glue.
//!
//! The data flow is: engine emits a lifecycle event, the owning
//! session updates its state, a completed navigation is resolved to a
//! visit kind by the classifier, and the visit is handed to the
//! history store. The store write is fire-and-forget on a spawned
//! task: browsing must never stall on persistence, and a failed write
//! is logged, not retried.

use std::sync::Arc;

use tabkit_engine::{EngineEvent, EngineViewHandle};
use tracing::warn;

use crate::classifier::{NavigationClassifier, VisitKind};
use crate::persistence::HistoryStore;
use crate::session::manager::SessionManager;

/// Feeds engine events through the manager, classifier, and history
/// store.
pub struct VisitPipeline {
    manager: Arc<SessionManager>,
    classifier: Arc<NavigationClassifier>,
    history: Option<Arc<dyn HistoryStore>>,
}

impl VisitPipeline {
    pub fn new(manager: Arc<SessionManager>, classifier: Arc<NavigationClassifier>) -> Self {
        Self {
            manager,
            classifier,
            history: None,
        }
    }

    /// Attaches a history store; completed classified navigations are
    /// recorded through it.
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// The classifier this pipeline resolves against.
    pub fn classifier(&self) -> &Arc<NavigationClassifier> {
        &self.classifier
    }

    /// Routes one engine event.
    ///
    /// Returns the visit kind the event resolved to, when it was a
    /// completed navigation that should be recorded. Ignored
    /// navigations and non-completion events return `None`. Must be
    /// called from a tokio runtime context when a history store is
    /// attached.
    pub fn handle_event(&self, view: EngineViewHandle, event: EngineEvent) -> Option<VisitKind> {
        // A failed navigation never resolves; drop its pending intent.
        if let EngineEvent::NavigationFailed {
            handle: Some(handle),
            ..
        } = &event
        {
            self.classifier.abandon(*handle);
        }

        let completed = self.manager.handle_engine_event(view, event)?;
        let kind = self.classifier.resolve(completed.handle)?;

        if let Some(history) = &self.history {
            let history = history.clone();
            let url = completed.url.clone();
            let title = completed.title.clone();
            tokio::spawn(async move {
                if let Err(err) = history.record_visit(&url, title.as_deref(), kind).await {
                    warn!(target: "tabkit.visits", %url, error = %err, "history visit write failed");
                }
            });
        }
        Some(kind)
    }
}

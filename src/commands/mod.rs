pub mod chat;
pub mod knowledge;

use crate::api::{ApiError, Backend, HealthStatus};
use crate::store::models::{DocId, Document, Turn};
use crate::store::{RequestKind, Store};
use std::sync::Arc;
use uuid::Uuid;

pub const UPLOAD_FAILED: &str = "❌ Error uploading document. Please try again.";
pub const SEND_FAILED: &str = "❌ Error sending message. Please try again.";

pub(crate) fn error_text(detail: &str) -> String {
    format!("❌ Error: {}", detail)
}

pub(crate) fn welcome_text(filename: &str) -> String {
    format!(
        "✅ Document \"{}\" uploaded successfully! You can now ask questions about it.",
        filename
    )
}

/// Snapshot taken when a chat request is issued. The reply lands in
/// `doc_id`'s session no matter what is selected by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub doc_id: DocId,
}

impl RequestContext {
    pub fn new(doc_id: DocId) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            doc_id,
        }
    }
}

/// Marks one request in flight for as long as it lives.
struct InFlight {
    store: Arc<Store>,
    kind: RequestKind,
}

impl InFlight {
    fn begin(store: &Arc<Store>, kind: RequestKind) -> Self {
        store.lock().flags.begin(kind);
        Self {
            store: Arc::clone(store),
            kind,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.store.lock().flags.finish(self.kind);
    }
}

/// The document chat client: shared state plus the backend it talks to.
///
/// Clones share the same state, so a clone can be moved into a spawned task
/// while the original keeps serving reads and selections.
pub struct ChatApp<B> {
    store: Arc<Store>,
    backend: Arc<B>,
}

impl<B> Clone for ChatApp<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> ChatApp<B> {
    pub fn new(backend: B) -> Self {
        Self {
            store: Arc::new(Store::new()),
            backend: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The selected document's conversation.
    pub fn visible(&self) -> Vec<Turn> {
        self.store.lock().visible().to_vec()
    }

    pub fn session(&self, doc_id: DocId) -> Vec<Turn> {
        self.store.lock().sessions.get_visible(doc_id).to_vec()
    }

    pub fn has_session(&self, doc_id: DocId) -> bool {
        self.store.lock().sessions.contains(doc_id)
    }

    pub fn has_any_session(&self) -> bool {
        !self.store.lock().sessions.is_empty()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.store.lock().registry.documents().to_vec()
    }

    pub fn selected(&self) -> Option<DocId> {
        self.store.lock().registry.selected()
    }

    pub fn selected_document(&self) -> Option<Document> {
        self.store.lock().registry.selected_document().cloned()
    }

    pub fn uploading(&self) -> bool {
        self.store.lock().flags.uploading()
    }

    pub fn sending(&self) -> bool {
        self.store.lock().flags.sending()
    }

    pub fn can_upload(&self) -> bool {
        !self.uploading()
    }

    /// Whether the send affordance should be enabled.
    pub fn can_send(&self) -> bool {
        let state = self.store.lock();
        !state.flags.sending()
            && state.registry.selected().is_some()
            && !state.input.trim().is_empty()
    }

    pub fn input(&self) -> String {
        self.store.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.store.lock().input = text.into();
    }

    pub fn notice(&self) -> Option<Turn> {
        self.store.lock().notice.clone()
    }

    pub fn dismiss_notice(&self) {
        self.store.lock().notice = None;
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let result = self.backend.health().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "backend health check failed");
        }
        result
    }
}

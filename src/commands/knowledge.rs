use super::{error_text, welcome_text, ChatApp, InFlight, UPLOAD_FAILED};
use crate::api::{ApiError, Backend, FileUpload};
use crate::store::models::{DocId, Turn};
use crate::store::RequestKind;
use std::path::Path;
use uuid::Uuid;

/// Extension the file picker offers for upload.
pub const ACCEPTED_EXTENSION: &str = "pdf";

pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ACCEPTED_EXTENSION))
}

impl<B: Backend> ChatApp<B> {
    /// Replaces the document list with the backend's. Selects the first
    /// document when nothing is selected yet.
    ///
    /// On failure the previous list and selection are kept and the error is
    /// logged; it is also returned so a caller may surface it.
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let documents = match self.backend.list_documents().await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!(error = %e, "failed to refresh documents, keeping previous list");
                return Err(e);
            }
        };

        let count = documents.len();
        let mut state = self.store.lock();
        if state.registry.replace(documents) {
            tracing::debug!(doc_id = ?state.registry.selected(), "selected first document");
        }
        Ok(count)
    }

    /// Makes `doc_id` the active document. Unknown ids are allowed and show
    /// an empty conversation.
    pub fn select_document(&self, doc_id: DocId) {
        let mut state = self.store.lock();
        state.registry.select(doc_id);
        state.notice = None;
    }

    /// Uploads `file` and, on success, selects the new document and seeds its
    /// session with a welcome turn.
    ///
    /// Failures never touch any session: there is no document id to key them
    /// on, so they become the page-level notice instead. Returns the new id on
    /// success.
    pub async fn upload_document(&self, file: FileUpload) -> Option<DocId> {
        let request_id = Uuid::new_v4();
        let _in_flight = InFlight::begin(&self.store, RequestKind::Upload);
        tracing::debug!(%request_id, filename = %file.filename, "uploading document");

        let resp = match self.backend.upload_document(file).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "upload failed");
                let content = match e.detail() {
                    Some(detail) => error_text(detail),
                    None => UPLOAD_FAILED.to_string(),
                };
                self.store.lock().notice = Some(Turn::assistant(content));
                return None;
            }
        };

        self.select_document(resp.doc_id);
        // A failed refresh is already logged; the upload itself still stands.
        let _ = self.refresh().await;

        self.store
            .lock()
            .sessions
            .replace_visible(resp.doc_id, vec![Turn::assistant(welcome_text(&resp.filename))]);

        tracing::info!(
            %request_id,
            doc_id = resp.doc_id,
            filename = %resp.filename,
            chunks = ?resp.chunks_count,
            "document uploaded"
        );
        Some(resp.doc_id)
    }
}

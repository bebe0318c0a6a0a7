use super::{error_text, ChatApp, InFlight, RequestContext, SEND_FAILED};
use crate::api::Backend;
use crate::citations;
use crate::store::models::{DocId, Turn};
use crate::store::RequestKind;

impl<B: Backend> ChatApp<B> {
    /// Sends the draft to the selected document. Returns false when there is
    /// no selection or nothing to send.
    pub async fn send(&self) -> bool {
        let (doc_id, text) = {
            let state = self.store.lock();
            (state.registry.selected(), state.input.clone())
        };
        match doc_id {
            Some(doc_id) => self.send_message(doc_id, &text).await,
            None => false,
        }
    }

    /// Asks the backend about `doc_id`.
    ///
    /// The user turn is appended and the draft cleared before the request
    /// goes out. Whatever comes back (an answer or an error) is appended as
    /// an assistant turn to the same `doc_id`, even if the selection moved
    /// in the meantime. Returns false, doing nothing, when `text` is blank.
    pub async fn send_message(&self, doc_id: DocId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let ctx = RequestContext::new(doc_id);
        {
            let mut state = self.store.lock();
            state.sessions.append(ctx.doc_id, Turn::user(text));
            state.input.clear();
        }

        let _in_flight = InFlight::begin(&self.store, RequestKind::Chat);
        tracing::debug!(request_id = %ctx.request_id, doc_id = ctx.doc_id, "sending message");

        let turn = match self.backend.chat(ctx.doc_id, text).await {
            Ok(resp) => citations::assistant_turn(resp),
            Err(e) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    doc_id = ctx.doc_id,
                    error = %e,
                    "chat request failed"
                );
                match e.detail() {
                    Some(detail) => Turn::assistant(error_text(detail)),
                    None => Turn::assistant(SEND_FAILED),
                }
            }
        };

        tracing::debug!(request_id = %ctx.request_id, doc_id = ctx.doc_id, "reply appended");
        self.store.lock().sessions.append(ctx.doc_id, turn);
        true
    }
}

use crate::api::ChatResponse;
use crate::store::models::{Role, Turn};

/// Builds the assistant turn for a successful chat reply, with its sources attached.
///
/// Lengths are not reconciled here; readers pair labels and excerpts with
/// [`Turn::citation_pairs`], which stops at the shorter side. If the server
/// sent only one of the two lists the other is attached empty.
pub fn assistant_turn(response: ChatResponse) -> Turn {
    let ChatResponse {
        answer,
        citations,
        chunks,
    } = response;

    let (citations, chunks) = match (citations, chunks) {
        (None, None) => (None, None),
        (citations, chunks) => {
            let citations = citations.unwrap_or_default();
            let chunks = chunks.unwrap_or_default();
            if citations.len() != chunks.len() {
                tracing::debug!(
                    citations = citations.len(),
                    chunks = chunks.len(),
                    "citation/chunk count mismatch"
                );
            }
            (Some(citations), Some(chunks))
        }
    };

    Turn {
        role: Role::Assistant,
        content: answer,
        citations,
        chunks,
    }
}

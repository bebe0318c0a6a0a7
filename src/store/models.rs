use serde::{Deserialize, Serialize};

/// Backend-assigned document identifier.
pub type DocId = i64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Document {
    #[serde(rename = "doc_id")]
    pub id: DocId,
    pub filename: String,
    #[serde(rename = "chunks_count")]
    pub chunk_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a document's conversation.
///
/// `citations` and `chunks` are positionally paired: `chunks[i]` is the
/// excerpt behind `citations[i]`. When `citations` is set, `chunks` is set too.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<String>>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            citations: None,
            chunks: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations: None,
            chunks: None,
        }
    }

    pub fn has_citations(&self) -> bool {
        self.citations.is_some()
    }

    /// Citation labels paired with their excerpts, stopping at the shorter sequence.
    pub fn citation_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        let citations = self.citations.as_deref().unwrap_or_default();
        let chunks = self.chunks.as_deref().unwrap_or_default();
        citations
            .iter()
            .zip(chunks.iter())
            .map(|(label, excerpt)| (label.as_str(), excerpt.as_str()))
    }
}

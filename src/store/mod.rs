pub mod models;

use models::{DocId, Document, Turn};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// All client-side state, guarded by a single mutex.
///
/// Callers take the lock for one transition at a time and never hold it
/// across an `.await`.
#[derive(Default)]
pub struct Store {
    state: Mutex<AppState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub registry: DocumentRegistry,
    pub sessions: SessionStore,
    pub flags: RequestFlags,
    /// Draft text in the message box.
    pub input: String,
    /// Page-level message for failures that have no session to land in.
    pub notice: Option<Turn>,
}

impl AppState {
    /// The conversation for the selected document.
    pub fn visible(&self) -> &[Turn] {
        match self.registry.selected() {
            Some(id) => self.sessions.get_visible(id),
            None => &[],
        }
    }
}

// ── Documents ──

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    selected: Option<DocId>,
}

impl DocumentRegistry {
    /// Replaces the whole list. Selects the first document if nothing is
    /// selected yet. Returns true when the selection changed.
    pub fn replace(&mut self, documents: Vec<Document>) -> bool {
        self.documents = documents;
        if self.selected.is_none() {
            if let Some(first) = self.documents.first() {
                self.selected = Some(first.id);
                return true;
            }
        }
        false
    }

    /// Selects `id` whether or not it is in the list.
    pub fn select(&mut self, id: DocId) {
        self.selected = Some(id);
    }

    pub fn selected(&self) -> Option<DocId> {
        self.selected
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

// ── Sessions ──

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<DocId, Vec<Turn>>,
}

impl SessionStore {
    pub fn get_visible(&self, id: DocId) -> &[Turn] {
        self.sessions.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn append(&mut self, id: DocId, turn: Turn) {
        self.sessions.entry(id).or_default().push(turn);
    }

    /// Overwrites the session for `id`. Only used to seed a freshly uploaded document.
    pub fn replace_visible(&mut self, id: DocId, turns: Vec<Turn>) {
        self.sessions.insert(id, turns);
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ── Request flags ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Upload,
    Chat,
}

/// In-flight bookkeeping. Upload and chat are tracked independently.
#[derive(Debug, Default)]
pub struct RequestFlags {
    uploads: usize,
    chats: usize,
}

impl RequestFlags {
    pub fn begin(&mut self, kind: RequestKind) {
        match kind {
            RequestKind::Upload => self.uploads += 1,
            RequestKind::Chat => self.chats += 1,
        }
    }

    pub fn finish(&mut self, kind: RequestKind) {
        match kind {
            RequestKind::Upload => self.uploads = self.uploads.saturating_sub(1),
            RequestKind::Chat => self.chats = self.chats.saturating_sub(1),
        }
    }

    pub fn uploading(&self) -> bool {
        self.uploads > 0
    }

    pub fn sending(&self) -> bool {
        self.chats > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Role;

    fn doc(id: DocId, filename: &str) -> Document {
        Document {
            id,
            filename: filename.into(),
            chunk_count: 1,
        }
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let sessions = SessionStore::default();
        assert!(sessions.get_visible(42).is_empty());
        assert!(!sessions.contains(42));
    }

    #[test]
    fn test_append_preserves_order() {
        let mut sessions = SessionStore::default();
        sessions.append(1, Turn::user("first"));
        sessions.append(1, Turn::assistant("second"));
        sessions.append(2, Turn::user("elsewhere"));
        sessions.append(1, Turn::user("third"));

        let contents: Vec<_> = sessions
            .get_visible(1)
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(sessions.get_visible(1).last().unwrap().role, Role::User);
        assert_eq!(sessions.get_visible(2).len(), 1);
    }

    #[test]
    fn test_replace_visible_overwrites() {
        let mut sessions = SessionStore::default();
        sessions.append(3, Turn::user("old"));
        sessions.replace_visible(3, vec![Turn::assistant("welcome")]);
        assert_eq!(sessions.get_visible(3), &[Turn::assistant("welcome")]);
    }

    #[test]
    fn test_replace_selects_first_when_unselected() {
        let mut registry = DocumentRegistry::default();
        assert!(registry.replace(vec![doc(4, "a.pdf"), doc(9, "b.pdf")]));
        assert_eq!(registry.selected(), Some(4));

        // Existing selection is kept.
        assert!(!registry.replace(vec![doc(9, "b.pdf")]));
        assert_eq!(registry.selected(), Some(4));
        assert!(registry.selected_document().is_none());
    }

    #[test]
    fn test_replace_empty_keeps_no_selection() {
        let mut registry = DocumentRegistry::default();
        assert!(!registry.replace(Vec::new()));
        assert_eq!(registry.selected(), None);
    }

    #[test]
    fn test_visible_follows_selection() {
        let mut state = AppState::default();
        assert!(state.visible().is_empty());
        state.sessions.append(1, Turn::user("one"));
        state.sessions.append(2, Turn::user("two"));
        state.registry.select(2);
        assert_eq!(state.visible()[0].content, "two");
        state.registry.select(77);
        assert!(state.visible().is_empty());
    }

    #[test]
    fn test_flags_are_independent() {
        let mut flags = RequestFlags::default();
        flags.begin(RequestKind::Chat);
        flags.begin(RequestKind::Chat);
        assert!(flags.sending());
        assert!(!flags.uploading());
        flags.finish(RequestKind::Chat);
        assert!(flags.sending());
        flags.finish(RequestKind::Chat);
        flags.finish(RequestKind::Chat);
        assert!(!flags.sending());
    }
}

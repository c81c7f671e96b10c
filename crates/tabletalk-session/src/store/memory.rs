//! In-memory session store
//!
//! Keeps sessions in a vector so listing preserves insertion order.

use super::{SessionStore, StoreError, StoreResult};
use crate::{ChatSession, Message};
use tracing::debug;

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Vec<ChatSession>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }
}

impl SessionStore for MemorySessionStore {
    fn insert(&mut self, session: ChatSession) -> StoreResult<()> {
        if self.position(&session.id).is_some() {
            return Err(StoreError::Duplicate(session.id));
        }
        debug!("Stored session {} for table {}", session.id, session.table_id);
        self.sessions.push(session);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn remove(&mut self, id: &str) -> Option<ChatSession> {
        let index = self.position(id)?;
        debug!("Removed session {}", id);
        Some(self.sessions.remove(index))
    }

    fn remove_for_table(&mut self, table_id: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.table_id != table_id);
        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!("Removed {} session(s) for table {}", removed, table_id);
        }
        removed
    }

    fn append(&mut self, id: &str, message: Message) -> StoreResult<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        session.add_message(message);
        Ok(())
    }

    fn list(&self) -> Vec<&ChatSession> {
        self.sessions.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn store_with(sessions: &[(&str, &str)]) -> (MemorySessionStore, Vec<String>) {
        let mut store = MemorySessionStore::new();
        let mut ids = Vec::new();
        for (table_id, name) in sessions {
            let session = ChatSession::new(*table_id, *name);
            ids.push(session.id.clone());
            store.insert(session).unwrap();
        }
        (store, ids)
    }

    #[test]
    fn test_insert_and_get() {
        let (store, ids) = store_with(&[("table-1", "First")]);
        assert_eq!(store.get(&ids[0]).unwrap().name, "First");
        assert!(store.get(&ids[0]).is_some());
        assert!(store.get("chat-missing").is_none());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut store = MemorySessionStore::new();
        let session = ChatSession::new("table-1", "First");
        store.insert(session.clone()).unwrap();
        let err = store.insert(session).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_for_table_only_touches_that_table() {
        let (mut store, ids) = store_with(&[
            ("table-1", "A"),
            ("table-2", "B"),
            ("table-1", "C"),
        ]);

        assert_eq!(store.remove_for_table("table-1"), 2);
        assert_eq!(store.len(), 1);
        assert!(store.get(&ids[1]).is_some());
        assert_eq!(store.remove_for_table("table-1"), 0);
    }

    #[test]
    fn test_append_to_missing_session() {
        let mut store = MemorySessionStore::new();
        let result = store.append("chat-missing", Message::user("hi"));
        assert_eq!(result, Err(StoreError::NotFound("chat-missing".into())));
    }

    #[test]
    fn test_append_keeps_order() {
        let (mut store, ids) = store_with(&[("table-1", "A")]);
        store.append(&ids[0], Message::user("question")).unwrap();
        store.append(&ids[0], Message::system("answer")).unwrap();

        let session = store.get(&ids[0]).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[1].content, "answer");
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let (store, _) = store_with(&[
            ("table-1", "Revenue questions"),
            ("table-2", "Churn"),
            ("table-1", "Revenue follow-up"),
        ]);

        let all = store.list();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Revenue questions", "Churn", "Revenue follow-up"]);
    }

    #[test]
    fn test_remove() {
        let (mut store, ids) = store_with(&[("table-1", "A")]);
        assert!(store.remove(&ids[0]).is_some());
        assert!(store.remove(&ids[0]).is_none());
        assert!(store.is_empty());
    }
}

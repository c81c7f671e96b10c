//! Session data structures
//!
//! Defines the core types for chat sessions:
//! - ChatSession: a conversation about one table
//! - Message: individual conversation messages
//! - Role: who wrote a message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant or greeting message
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::System => write!(f, "system"),
        }
    }
}

/// Individual conversation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (`msg-<uuid>`)
    pub id: String,

    /// Message role
    pub role: Role,

    /// Message content
    pub content: String,

    /// Message timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// A conversation about a single table
///
/// `table_id` is a lookup key only: the session does not own the table, and
/// the table may disappear while the session is still referenced elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique session identifier (`chat-<uuid>`)
    pub id: String,

    /// Table this session talks about
    pub table_id: String,

    /// Display name
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Conversation messages, oldest first
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Create an empty session for a table
    pub fn new(table_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: format!("chat-{}", Uuid::new_v4()),
            table_id: table_id.into(),
            name: name.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Create a session that opens with the assistant greeting for `table_name`
    pub fn with_greeting(
        table_id: impl Into<String>,
        table_name: &str,
        name: Option<String>,
    ) -> Self {
        let name = name.unwrap_or_else(|| format!("Chat about {}", table_name));
        let mut session = Self::new(table_id, name);
        session.add_message(Message::system(format!(
            "This is an AI assistant to help you analyze the table: {}. Ask any questions about the data.",
            table_name
        )));
        session
    }

    /// Append a message to the conversation
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Most recent message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Check if the session has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = ChatSession::new("table-1", "Test Session");
        assert_eq!(session.name, "Test Session");
        assert_eq!(session.table_id, "table-1");
        assert!(session.id.starts_with("chat-"));
        assert!(session.is_empty());
    }

    #[test]
    fn test_greeting_and_default_name() {
        let session = ChatSession::with_greeting("table-1", "sales", None);
        assert_eq!(session.name, "Chat about sales");
        assert_eq!(session.len(), 1);

        let greeting = &session.messages[0];
        assert_eq!(greeting.role, Role::System);
        assert_eq!(
            greeting.content,
            "This is an AI assistant to help you analyze the table: sales. Ask any questions about the data."
        );
    }

    #[test]
    fn test_custom_name_wins() {
        let session = ChatSession::with_greeting("table-1", "sales", Some("Q3 review".into()));
        assert_eq!(session.name, "Q3 review");
    }

    #[test]
    fn test_last_message() {
        let mut session = ChatSession::new("table-1", "Test");
        assert!(session.last_message().is_none());
        for i in 0..10 {
            session.add_message(Message::user(format!("Message {}", i)));
        }

        assert_eq!(session.len(), 10);
        assert_eq!(session.last_message().map(|m| m.content.as_str()), Some("Message 9"));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("msg-"));
    }

    #[test]
    fn test_serialized_field_names() {
        let session = ChatSession::new("table-1", "Test");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["tableId"], "table-1");
        assert!(json.get("createdAt").is_some());
    }
}

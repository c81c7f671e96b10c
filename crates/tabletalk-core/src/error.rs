//! Error types for TableTalk

use thiserror::Error;

/// Result type alias for TableTalk operations
pub type TabletalkResult<T> = Result<T, TabletalkError>;

/// Main error type for TableTalk
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TabletalkError {
    /// A merge needs at least two resolvable tables
    #[error("Need at least two tables to merge, found {found}")]
    InsufficientTables { found: usize },

    /// No table with this id is registered
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// No chat session with this id is registered
    #[error("Chat session not found: {0}")]
    SessionNotFound(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// The merge webhook rejected or failed the notification
    #[error("Webhook error: {message}")]
    Webhook { status: Option<u16>, message: String },

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl TabletalkError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new table-not-found error
    pub fn table_not_found(id: impl Into<String>) -> Self {
        Self::TableNotFound(id.into())
    }

    /// Create a new session-not-found error
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound(id.into())
    }

    /// Create a new webhook error
    pub fn webhook(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Webhook {
            status,
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller referencing something absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::SessionNotFound(_))
    }
}

impl From<std::io::Error> for TabletalkError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for TabletalkError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for TabletalkError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            TabletalkError::InsufficientTables { found: 1 }.to_string(),
            "Need at least two tables to merge, found 1"
        );
        assert_eq!(
            TabletalkError::webhook(Some(502), "endpoint returned 502 Bad Gateway").to_string(),
            "Webhook error: endpoint returned 502 Bad Gateway"
        );
        assert_eq!(
            TabletalkError::webhook(None, "connection refused").to_string(),
            "Webhook error: connection refused"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(TabletalkError::table_not_found("table-1").is_not_found());
        assert!(TabletalkError::session_not_found("chat-1").is_not_found());
        assert!(!TabletalkError::config("x").is_not_found());
    }
}

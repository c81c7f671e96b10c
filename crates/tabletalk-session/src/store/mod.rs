//! Session store abstraction and implementations
//!
//! Provides a trait-based store for chat sessions with an in-memory
//! implementation. Sessions are kept in insertion order.

mod memory;

pub use memory::MemorySessionStore;

use crate::{ChatSession, Message};
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    Duplicate(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Session store trait for different backends
pub trait SessionStore: Send + Sync {
    /// Insert a new session
    fn insert(&mut self, session: ChatSession) -> StoreResult<()>;

    /// Look up a session by ID
    fn get(&self, id: &str) -> Option<&ChatSession>;

    /// Remove a session by ID, returning it if it existed
    fn remove(&mut self, id: &str) -> Option<ChatSession>;

    /// Remove every session bound to `table_id`, returning how many were removed
    fn remove_for_table(&mut self, table_id: &str) -> usize;

    /// Append a message to an existing session
    fn append(&mut self, id: &str, message: Message) -> StoreResult<()>;

    /// All sessions in insertion order
    fn list(&self) -> Vec<&ChatSession>;
}

//! Chat session management for TableTalk
//!
//! This crate provides the chat side of the workspace:
//! - Chat sessions bound (weakly) to a table id
//! - Message history with user/system roles
//! - A session store trait with an in-memory implementation

pub mod session;
pub mod store;

pub use session::{ChatSession, Message, Role};
pub use store::{MemorySessionStore, SessionStore, StoreError, StoreResult};

//! In-memory registry of tables and chat sessions
//!
//! The registry is an explicit object: construct one per process (or per
//! test) and pass it to whatever needs it. Lookups return `Option` and never
//! fail; operations that need an existing table or session return
//! `TableNotFound` / `SessionNotFound` and leave the registry untouched.

use crate::csv::{parse_csv, table_name_from_file};
use crate::error::{TabletalkError, TabletalkResult};
use crate::merge::{MergeRequest, merge_tables};
use crate::responder;
use crate::types::{Column, Table, TableKind};
use parking_lot::Mutex;
use std::sync::Arc;
use tabletalk_session::{ChatSession, MemorySessionStore, Message, SessionStore};
use tracing::{debug, info};

/// Registry shared between the caller and delayed tasks
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// An answer waiting to be appended to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub session_id: String,
    pub content: String,
}

/// What happened to a pending reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Appended to the session as this message id
    Delivered(String),
    /// The session was deleted before the reply landed
    SessionGone,
    /// The delivery task was cancelled
    Cancelled,
}

/// Result of deleting a table
#[derive(Debug, Clone)]
pub struct DeletedTable {
    pub table: Table,
    /// Number of chat sessions removed with the table
    pub removed_sessions: usize,
}

/// Tables and chat sessions, in insertion order
pub struct Registry {
    tables: Vec<Table>,
    sessions: Box<dyn SessionStore>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry backed by an in-memory session store
    pub fn new() -> Self {
        Self::with_session_store(Box::new(MemorySessionStore::new()))
    }

    /// Create an empty registry with a custom session store
    pub fn with_session_store(sessions: Box<dyn SessionStore>) -> Self {
        Self {
            tables: Vec::new(),
            sessions,
        }
    }

    /// Wrap the registry for sharing with delayed tasks
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    /// Register a table, returning its id
    pub fn insert_table(&mut self, table: Table) -> String {
        let id = table.id.clone();
        debug!("Registered table {} ('{}', {} rows)", id, table.name, table.row_count);
        self.tables.push(table);
        id
    }

    /// Parse CSV text and register it as an uploaded table
    ///
    /// `file_name` loses its last extension to become the table name.
    pub fn upload(&mut self, text: &str, file_name: &str) -> String {
        let parsed = parse_csv(text);
        let table = Table::uploaded(table_name_from_file(file_name), parsed.columns, parsed.rows);
        info!(
            "Uploaded table '{}' with {} rows",
            table.name, table.row_count
        );
        self.insert_table(table)
    }

    /// Look up a table
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Columns of a table, empty when the table is unknown
    pub fn table_columns(&self, id: &str) -> &[Column] {
        self.table(id).map(|t| t.columns.as_slice()).unwrap_or(&[])
    }

    /// All tables in insertion order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Delete a table and every chat session about it
    pub fn delete_table(&mut self, id: &str) -> Option<DeletedTable> {
        let index = self.tables.iter().position(|t| t.id == id)?;
        let table = self.tables.remove(index);
        let removed_sessions = self.sessions.remove_for_table(id);
        info!(
            "Deleted table '{}' and {} chat session(s)",
            table.name, removed_sessions
        );
        Some(DeletedTable {
            table,
            removed_sessions,
        })
    }

    /// Merge registered tables and register the result
    ///
    /// Unknown ids are skipped. Nothing is registered unless the merge
    /// succeeds.
    pub fn merge(&mut self, request: &MergeRequest) -> TabletalkResult<String> {
        let sources: Vec<&Table> = request
            .table_ids
            .iter()
            .filter_map(|id| {
                let table = self.table(id);
                if table.is_none() {
                    debug!("Skipping unknown table {} in merge", id);
                }
                table
            })
            .collect();

        let name = if request.name.trim().is_empty() {
            let merged_count = self
                .tables
                .iter()
                .filter(|t| t.kind == TableKind::Merged)
                .count();
            format!("Merged Table {}", merged_count + 1)
        } else {
            request.name.trim().to_string()
        };

        let merged = merge_tables(&sources, &name, request)?;
        Ok(self.insert_table(merged))
    }

    // ---------------------------------------------------------------------
    // Chat sessions
    // ---------------------------------------------------------------------

    /// Open a chat session about a table
    pub fn create_chat_session(
        &mut self,
        table_id: &str,
        name: Option<String>,
    ) -> TabletalkResult<String> {
        let table = self
            .table(table_id)
            .ok_or_else(|| TabletalkError::table_not_found(table_id))?;
        let session = ChatSession::with_greeting(table_id, &table.name, name);
        let id = session.id.clone();
        self.sessions
            .insert(session)
            .map_err(|e| TabletalkError::Other(e.to_string()))?;
        info!("Created chat session {} for table {}", id, table_id);
        Ok(id)
    }

    /// Look up a chat session
    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    /// All chat sessions in insertion order
    pub fn sessions(&self) -> Vec<&ChatSession> {
        self.sessions.list()
    }

    /// Delete a chat session; false when it did not exist
    pub fn delete_session(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Append a message; false when the session no longer exists
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        self.sessions.append(session_id, message).is_ok()
    }

    /// Record a user message and compute the assistant's answer
    ///
    /// The answer is returned as a [`PendingReply`] rather than appended, so
    /// the caller decides when it lands (see [`crate::scheduler`]).
    pub fn send_message(&mut self, session_id: &str, text: &str) -> TabletalkResult<PendingReply> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| TabletalkError::session_not_found(session_id))?;
        let table = self
            .table(&session.table_id)
            .ok_or_else(|| TabletalkError::table_not_found(session.table_id.clone()))?;

        let content = responder::answer(text, table);
        self.sessions
            .append(session_id, Message::user(text))
            .map_err(|e| TabletalkError::Other(e.to_string()))?;

        Ok(PendingReply {
            session_id: session_id.to_string(),
            content,
        })
    }

    /// Append a pending reply if its session still exists
    pub fn deliver_reply(&mut self, reply: PendingReply) -> ReplyOutcome {
        let message = Message::system(reply.content);
        let message_id = message.id.clone();
        if self.append_message(&reply.session_id, message) {
            ReplyOutcome::Delivered(message_id)
        } else {
            debug!("Dropping reply for deleted session {}", reply.session_id);
            ReplyOutcome::SessionGone
        }
    }
}

//! TableTalk Core Library
//!
//! This crate provides the core functionality for TableTalk, including CSV
//! parsing, the join engine, merges, the table/session registry, the rule-based
//! assistant and outbound merge notifications.

pub mod config;
pub mod csv;
pub mod error;
pub mod join;
pub mod merge;
pub mod registry;
pub mod responder;
pub mod scheduler;
pub mod types;
pub mod webhook;

// Re-export commonly used types
pub use config::{ChatConfig, LogFormat, LoggingConfig, TabletalkConfig, WebhookConfig};
pub use csv::{ParsedCsv, export_csv, parse_csv, table_name_from_file};
pub use error::{TabletalkError, TabletalkResult};
pub use join::{ColumnMapping, JoinKind, JoinOutput, join_tables};
pub use merge::{MergeRequest, MergeStrategy, merge_tables, suggested_merge_name};
pub use registry::{DeletedTable, PendingReply, Registry, ReplyOutcome, SharedRegistry};
pub use scheduler::{ReplyHandle, ReplyScheduler};
pub use types::*;
pub use webhook::{MergePayload, WebhookNotifier, WebhookOutcome};

pub use tabletalk_session::{ChatSession, Message, Role};

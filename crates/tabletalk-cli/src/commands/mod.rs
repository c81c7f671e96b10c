//! CLI commands

pub mod ask;
pub mod chat;
pub mod config;
pub mod merge;
pub mod show;

use std::path::Path;
use tabletalk_core::{Registry, TabletalkError, TabletalkResult};

/// Read a CSV file and register it as an uploaded table
pub(crate) async fn upload_file(registry: &mut Registry, path: &Path) -> TabletalkResult<String> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        TabletalkError::Io(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(registry.upload(&text, &file_name))
}

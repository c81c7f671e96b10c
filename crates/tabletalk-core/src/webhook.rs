//! Outbound merge notifications
//!
//! After a merge is registered, a summary of the merged table and a preview
//! of each source table can be POSTed to an external workflow endpoint.
//! Delivery is best effort: failures are logged and reported to the caller,
//! but the merge itself has already succeeded by the time the request starts.

use crate::config::WebhookConfig;
use crate::error::{TabletalkError, TabletalkResult};
use crate::types::{Column, Row, Table};
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Event name sent with every merge notification
pub const MERGE_EVENT: &str = "tables.merged";

/// Summary of the merged table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedTableSummary {
    pub id: String,
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<Column>,
}

/// Preview of one source table
#[derive(Debug, Clone, Serialize)]
pub struct SourceTablePreview {
    pub id: String,
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// JSON body of a merge notification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePayload {
    pub event: &'static str,
    pub merged_table: MergedTableSummary,
    pub source_tables: Vec<SourceTablePreview>,
}

impl MergePayload {
    /// Build a payload with at most `preview_rows` rows per source table
    pub fn new(merged: &Table, sources: &[&Table], preview_rows: usize) -> Self {
        Self {
            event: MERGE_EVENT,
            merged_table: MergedTableSummary {
                id: merged.id.clone(),
                name: merged.name.clone(),
                row_count: merged.row_count,
                columns: merged.columns.clone(),
            },
            source_tables: sources
                .iter()
                .map(|t| SourceTablePreview {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    columns: t.columns.iter().map(|c| c.accessor.clone()).collect(),
                    rows: t.rows.iter().take(preview_rows).cloned().collect(),
                })
                .collect(),
        }
    }
}

/// What a notification attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// No endpoint configured
    Skipped,
    /// The endpoint accepted the notification
    Sent { status: u16 },
}

/// HTTP client for merge notifications
#[derive(Clone)]
pub struct WebhookNotifier {
    url: Option<String>,
    preview_rows: usize,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier from configuration
    pub fn new(config: &WebhookConfig) -> TabletalkResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            url: config.url.clone().filter(|u| !u.trim().is_empty()),
            preview_rows: config.preview_rows,
            http_client,
        })
    }

    /// Whether an endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Build the payload for a merge using the configured preview size
    pub fn payload(&self, merged: &Table, sources: &[&Table]) -> MergePayload {
        MergePayload::new(merged, sources, self.preview_rows)
    }

    /// POST a payload to the configured endpoint
    pub async fn notify(&self, payload: &MergePayload) -> TabletalkResult<WebhookOutcome> {
        let Some(url) = self.url.as_deref() else {
            debug!("No webhook configured, skipping merge notification");
            return Ok(WebhookOutcome::Skipped);
        };

        let response = self
            .http_client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| TabletalkError::webhook(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TabletalkError::webhook(
                Some(status.as_u16()),
                format!("endpoint returned {}: {}", status, body.trim()),
            ));
        }

        info!(
            "Sent merge notification for '{}' ({})",
            payload.merged_table.name, status
        );
        Ok(WebhookOutcome::Sent {
            status: status.as_u16(),
        })
    }

    /// Send in the background; failures are logged as warnings
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_notify(&self, payload: MergePayload) -> JoinHandle<TabletalkResult<WebhookOutcome>> {
        let notifier = self.clone();
        tokio::spawn(async move {
            let result = notifier.notify(&payload).await;
            if let Err(ref e) = result {
                warn!(
                    "Merge notification for '{}' failed: {}",
                    payload.merged_table.name, e
                );
            }
            result
        })
    }
}

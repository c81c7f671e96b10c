//! Configuration for TableTalk
//!
//! Settings come from a config file (TOML, YAML or JSON) with environment
//! overrides layered on top. Every section has defaults, so an absent file
//! or a partial one is fine.

pub mod env_loader;
pub mod file_loader;
pub mod logging_config;

pub use env_loader::{apply_env_overrides, apply_overrides_from};
pub use file_loader::{load_from_file, render_for, save_to_file};
pub use logging_config::{LogFormat, LoggingConfig};

use crate::error::TabletalkResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "tabletalk.toml";

/// Merge notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Endpoint to POST merge summaries to; `None` disables notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Request timeout
    pub timeout_secs: u64,
    /// Rows of each source table included in the payload
    pub preview_rows: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 30,
            preview_rows: 100,
        }
    }
}

/// Chat settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before an assistant reply is appended
    pub reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
        }
    }
}

impl ChatConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabletalkConfig {
    pub logging: LoggingConfig,
    pub webhook: WebhookConfig,
    pub chat: ChatConfig,
}

impl TabletalkConfig {
    /// Load `path` (defaults when missing) and apply environment overrides
    pub fn load(path: &Path) -> TabletalkResult<Self> {
        let mut config = load_from_file(path)?;
        apply_env_overrides(&mut config)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TabletalkConfig::default();
        assert!(config.webhook.url.is_none());
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.webhook.preview_rows, 100);
        assert_eq!(config.chat.reply_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TabletalkConfig =
            serde_json::from_str(r#"{"chat": {}, "logging": {"level": "info"}}"#).unwrap();
        assert_eq!(config.chat.reply_delay_ms, 1000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}

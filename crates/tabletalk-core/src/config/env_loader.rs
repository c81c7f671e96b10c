//! Environment variable overrides

use super::{LogFormat, TabletalkConfig};
use crate::error::{TabletalkError, TabletalkResult};
use std::str::FromStr;

pub const ENV_WEBHOOK_URL: &str = "TABLETALK_WEBHOOK_URL";
pub const ENV_WEBHOOK_TIMEOUT_SECS: &str = "TABLETALK_WEBHOOK_TIMEOUT_SECS";
pub const ENV_REPLY_DELAY_MS: &str = "TABLETALK_REPLY_DELAY_MS";
pub const ENV_LOG_LEVEL: &str = "TABLETALK_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "TABLETALK_LOG_FORMAT";

/// Apply overrides from the process environment
pub fn apply_env_overrides(config: &mut TabletalkConfig) -> TabletalkResult<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to read variables
///
/// An empty `TABLETALK_WEBHOOK_URL` clears the configured URL.
pub fn apply_overrides_from<F>(config: &mut TabletalkConfig, lookup: F) -> TabletalkResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_WEBHOOK_URL) {
        let url = url.trim();
        config.webhook.url = (!url.is_empty()).then(|| url.to_string());
    }

    if let Some(value) = lookup(ENV_WEBHOOK_TIMEOUT_SECS) {
        config.webhook.timeout_secs = parse_var(ENV_WEBHOOK_TIMEOUT_SECS, &value)?;
    }

    if let Some(value) = lookup(ENV_REPLY_DELAY_MS) {
        config.chat.reply_delay_ms = parse_var(ENV_REPLY_DELAY_MS, &value)?;
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        if !level.trim().is_empty() {
            config.logging.level = level.trim().to_string();
        }
    }

    if let Some(value) = lookup(ENV_LOG_FORMAT) {
        config.logging.format = LogFormat::from_str(&value)
            .map_err(|e| TabletalkError::config(format!("Invalid {} value: {}", ENV_LOG_FORMAT, e)))?;
    }

    Ok(())
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> TabletalkResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TabletalkError::config(format!("Invalid {} value '{}'", key, value)))
}

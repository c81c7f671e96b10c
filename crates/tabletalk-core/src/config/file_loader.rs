//! File-based configuration loading and saving

use super::TabletalkConfig;
use crate::error::{TabletalkError, TabletalkResult};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        }
    }
}

/// Load configuration from a file
///
/// TOML, YAML or JSON is chosen by extension; anything else is read as JSON.
/// A missing file yields the defaults.
pub fn load_from_file(path: &Path) -> TabletalkResult<TabletalkConfig> {
    if !path.exists() {
        return Ok(TabletalkConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        TabletalkError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config = match FileFormat::of(path) {
        FileFormat::Toml => toml::from_str(&content).map_err(|e| {
            TabletalkError::config(format!(
                "Failed to parse TOML config '{}': {}",
                path.display(),
                e
            ))
        })?,
        FileFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| {
            TabletalkError::config(format!(
                "Failed to parse YAML config '{}': {}",
                path.display(),
                e
            ))
        })?,
        FileFormat::Json => serde_json::from_str(&content).map_err(|e| {
            TabletalkError::config(format!(
                "Failed to parse JSON config '{}': {}",
                path.display(),
                e
            ))
        })?,
    };

    Ok(config)
}

/// Render configuration in the format implied by `path`
pub fn render_for(path: &Path, config: &TabletalkConfig) -> TabletalkResult<String> {
    match FileFormat::of(path) {
        FileFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| TabletalkError::config(format!("Failed to render TOML config: {}", e))),
        FileFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| TabletalkError::config(format!("Failed to render YAML config: {}", e))),
        FileFormat::Json => Ok(serde_json::to_string_pretty(config)?),
    }
}

/// Write configuration to `path`, refusing to overwrite unless `force`
pub fn save_to_file(path: &Path, config: &TabletalkConfig, force: bool) -> TabletalkResult<()> {
    if path.exists() && !force {
        return Err(TabletalkError::config(format!(
            "Config file '{}' already exists",
            path.display()
        )));
    }
    let content = render_for(path, config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tabletalk.toml");
        fs::write(
            &path,
            r#"
[logging]
level = "debug"
format = "json"

[webhook]
url = "http://localhost:5678/webhook/merge"
preview_rows = 10
"#,
        )
        .unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.webhook.url.as_deref(),
            Some("http://localhost:5678/webhook/merge")
        );
        assert_eq!(config.webhook.preview_rows, 10);
        // unspecified fields keep defaults
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.chat.reply_delay_ms, 1000);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tabletalk.yml");
        fs::write(&path, "chat:\n  reply_delay_ms: 250\n").unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.chat.reply_delay_ms, 250);
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tabletalk.json");
        fs::write(&path, r#"{"webhook": {"timeout_secs": 5}}"#).unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.webhook.timeout_secs, 5);
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = load_from_file(Path::new("/nonexistent/tabletalk.toml")).unwrap();
        assert_eq!(config, TabletalkConfig::default());
    }

    #[test]
    fn test_load_from_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[webhook\nurl = ").unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, TabletalkError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["out.toml", "out.yaml", "out.json"] {
            let path = temp_dir.path().join("nested").join(name);
            let mut config = TabletalkConfig::default();
            config.webhook.url = Some("http://example.test/hook".to_string());

            save_to_file(&path, &config, false).unwrap();
            assert_eq!(load_from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tabletalk.toml");
        fs::write(&path, "").unwrap();

        let config = TabletalkConfig::default();
        assert!(save_to_file(&path, &config, false).is_err());
        save_to_file(&path, &config, true).unwrap();
    }
}

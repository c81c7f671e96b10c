//! Configuration management commands

use crate::console::CliConsole;
use colored::*;
use std::path::Path;
use tabletalk_core::TabletalkConfig;
use tabletalk_core::config::{render_for, save_to_file};
use tabletalk_core::error::TabletalkResult;

/// Write the default configuration to `path`
pub async fn init(path: &str, force: bool) -> TabletalkResult<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Initialization");

    if Path::new(path).exists() && !force {
        console.info("Use --force to overwrite");
    }
    save_to_file(Path::new(path), &TabletalkConfig::default(), force)?;

    console.success(&format!("Created configuration file: {}", path));
    console.info("Set webhook.url to receive merge notifications");
    Ok(())
}

/// Print the effective configuration (file plus environment overrides)
pub async fn show(config_file: &str, config: &TabletalkConfig) -> TabletalkResult<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    if Path::new(config_file).exists() {
        console.success(&format!("Loaded configuration from: {}", config_file));
    } else {
        console.warn(&format!("Configuration file not found: {}", config_file));
        console.info("Using default configuration");
    }

    eprintln!(
        "{} {}",
        "Webhook:".bold(),
        config.webhook.url.as_deref().unwrap_or("disabled")
    );
    println!("{}", render_for(Path::new(config_file), config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletalk_core::config::load_from_file;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_show() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabletalk.yaml");
        let path = path.to_str().unwrap();

        init(path, false).await.unwrap();
        assert_eq!(load_from_file(Path::new(path)).unwrap(), TabletalkConfig::default());

        assert!(init(path, false).await.is_err());
        init(path, true).await.unwrap();

        show(path, &TabletalkConfig::default()).await.unwrap();
    }
}

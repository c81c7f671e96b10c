//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;
use tabletalk_core::{TabletalkConfig, TabletalkResult};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: TabletalkConfig) -> TabletalkResult<()> {
    let verbose = cli.verbose;
    match cli.command {
        Commands::Show { file, limit, json } => {
            commands::show::show(&file, limit, json, verbose).await
        }
        Commands::Merge(args) => commands::merge::merge(args, &config, verbose).await,
        Commands::Ask { file, question } => commands::ask::ask(&file, &question, verbose)
            .await
            .map(|_| ()),
        Commands::Chat { file } => commands::chat::chat(&file, &config, verbose).await,
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = path.unwrap_or_else(|| cli.config_file.clone());
                commands::config::init(&path, force).await
            }
            ConfigAction::Show => commands::config::show(&cli.config_file, &config).await,
        },
    }
}

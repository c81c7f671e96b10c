//! TableTalk CLI application
//!
//! Upload CSV files, merge them with relational joins and ask simple
//! questions about the result.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/tabletalk-cli
//! ```
//!
//! # Usage
//!
//! ```bash
//! tabletalk show customers.csv
//! tabletalk merge customers.csv orders.csv --join left --on id=customer_id -o merged.csv
//! tabletalk ask merged.csv "what is the average amount?"
//! tabletalk chat merged.csv
//! ```
//!
//! Settings are read from `tabletalk.toml` (see `tabletalk config init`) and
//! `TABLETALK_*` environment variables. Set `RUST_LOG=debug` for verbose logging.

mod args;
mod commands;
mod console;
mod logging;
mod router;

use args::Cli;
use clap::Parser;
use std::path::Path;
use tabletalk_core::TabletalkConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let console = console::CliConsole::new(cli.verbose);

    let config = match TabletalkConfig::load(Path::new(&cli.config_file)) {
        Ok(config) => config,
        Err(e) => {
            console.error(&e.to_string());
            std::process::exit(2);
        }
    };
    logging::init(&config.logging, cli.verbose);

    if let Err(e) = router::route(cli, config).await {
        tracing::debug!("Command failed: {:?}", e);
        console.error(&e.to_string());
        std::process::exit(1);
    }
}

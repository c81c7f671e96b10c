//! CLI argument definitions using clap
//!
//! - tabletalk show <FILE>                    # Inspect one CSV file
//! - tabletalk merge <FILE>... --on id=id     # Join or union several files
//! - tabletalk ask <FILE> "<question>"        # One-shot assistant answer
//! - tabletalk chat <FILE>                    # Interactive chat about a file
//! - tabletalk config init/show               # Configuration management

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabletalk_core::JoinKind;
use tabletalk_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "tabletalk")]
#[command(about = "TableTalk - merge CSV tables and ask questions about them")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a CSV file and print its schema and rows
    Show {
        /// CSV file to read
        file: PathBuf,

        /// Maximum number of rows to print
        #[arg(long, short, default_value_t = 20)]
        limit: usize,

        /// Print the parsed table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge two or more CSV files into one table
    Merge(MergeArgs),

    /// Ask a single question about a CSV file
    Ask {
        /// CSV file to ask about
        file: PathBuf,

        /// The question, e.g. "how many rows?"
        question: String,
    },

    /// Chat interactively about a CSV file
    Chat {
        /// CSV file to chat about
        file: PathBuf,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// CSV files to merge, base table first
    #[arg(required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,

    /// Join kind: inner, left, right or outer
    #[arg(long = "join", value_name = "KIND", default_value = "inner")]
    pub join_kind: JoinKind,

    /// Key pair BASE=SECOND; repeat for composite keys
    #[arg(long = "on", value_name = "BASE=SECOND")]
    pub on: Vec<String>,

    /// Stack all files by column instead of joining the first two
    #[arg(long, conflicts_with = "on")]
    pub by_columns: bool,

    /// Name of the merged table (default "<first> + <second>")
    #[arg(long)]
    pub name: Option<String>,

    /// Write the merged CSV here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Do not notify the configured webhook
    #[arg(long)]
    pub no_webhook: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a configuration file with default settings
    Init {
        /// Where to write it (defaults to --config-file)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

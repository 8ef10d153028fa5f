//! CLI argument definitions using clap
//!
//! Commands:
//! - ormcheck validate [--config <path>] [--metadata <dir>] [--snapshot <file>]
//! - ormcheck check-schema [--config <path>] [--metadata <dir>] --snapshot <file>
//! - ormcheck rules

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ormcheck - static consistency checker for ORM mapping metadata
#[derive(Parser, Debug)]
#[command(name = "ormcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Report format on stdout
#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options shared by every command that loads metadata
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to configuration file (default: ./ormcheck.json if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of entity descriptor files
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Minimum log level: trace, info, warn, error
    #[arg(long)]
    pub log_level: Option<String>,

    /// Only log errors
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the mapping metadata and, optionally, database schema sync
    Validate {
        #[command(flatten)]
        common: CommonArgs,

        /// Database snapshot to check schema sync against
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Skip the mapping validation
        #[arg(long)]
        skip_mapping: bool,

        /// Skip the database schema sync check
        #[arg(long)]
        skip_sync: bool,

        /// Report format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Only check that the database snapshot matches the metadata
    CheckSchema {
        #[command(flatten)]
        common: CommonArgs,

        /// Database snapshot to check schema sync against
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// List every validation rule
    Rules,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

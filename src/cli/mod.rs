//! CLI module for ormcheck
//!
//! Provides command-line interface for:
//! - validate: mapping validation plus optional schema sync check
//! - check-schema: schema sync check only
//! - rules: list every validation rule

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, CommonArgs, OutputFormat};
pub use commands::{
    check_schema, run_command, validate, CheckOutcome, SyncOutcome, EXIT_MAPPING_INVALID,
    EXIT_SCHEMA_OUT_OF_SYNC,
};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_outcome, write_rules};

/// Parse process arguments, run the command and return its exit status.
pub fn run() -> CliResult<i32> {
    let cli = Cli::parse_args();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(cli.command, &mut out)
}

//! ormcheck CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`, prints errors to stderr
//! and exits with the command's status:
//! - 0: everything checked is consistent
//! - 1: mapping invalid (or the command failed)
//! - 2: database schema out of sync
//! - 3: both

use ormcheck::cli;
use ormcheck::observability::Logger;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            Logger::error("COMMAND_FAILED", &[("code", e.code_str()), ("reason", e.message())]);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

//! Report rendering for the CLI
//!
//! Reports go to stdout (or any writer); logs go to stderr.
//! - text: one status line per check, then `* finding` lines
//! - json: a single JSON object followed by a newline

use std::io::Write;

use serde_json::json;

use crate::validator::Rule;

use super::args::OutputFormat;
use super::commands::CheckOutcome;
use super::errors::CliResult;

/// Write the outcome in the requested format
pub fn write_outcome<W: Write>(
    out: &mut W,
    format: OutputFormat,
    outcome: &CheckOutcome,
) -> CliResult<()> {
    match format {
        OutputFormat::Text => write_text(out, outcome),
        OutputFormat::Json => write_json(out, outcome),
    }
}

fn write_text<W: Write>(out: &mut W, outcome: &CheckOutcome) -> CliResult<()> {
    match &outcome.mapping {
        None => writeln!(out, "[Mapping]  Skipped mapping check.")?,
        Some(report) if report.is_valid() => {
            writeln!(out, "[Mapping]  OK - The mapping files are correct.")?
        }
        Some(report) => {
            for (entity, errors) in report.iter() {
                writeln!(
                    out,
                    "[Mapping]  FAIL - The entity-class '{}' mapping is invalid:",
                    entity
                )?;
                for error in errors {
                    writeln!(out, "* {}", error)?;
                }
                writeln!(out)?;
            }
        }
    }

    match &outcome.sync {
        None => writeln!(out, "[Database] SKIPPED - The database schema sync check was not run.")?,
        Some(sync) if sync.in_sync => writeln!(
            out,
            "[Database] OK - The database schema is in sync with the mapping files."
        )?,
        Some(sync) => {
            writeln!(
                out,
                "[Database] FAIL - The database schema is not in sync with the current mapping file."
            )?;
            for change in &sync.pending_changes {
                writeln!(out, "* {}", change)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn write_json<W: Write>(out: &mut W, outcome: &CheckOutcome) -> CliResult<()> {
    let status = if outcome.exit_code() == 0 { "ok" } else { "invalid" };

    let response = json!({
        "status": status,
        "mapping": outcome.mapping,
        "schema_in_sync": outcome.sync.as_ref().map(|s| s.in_sync),
        "pending_changes": outcome.sync.as_ref().map(|s| &s.pending_changes),
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write the rule catalogue
pub fn write_rules<W: Write>(out: &mut W) -> CliResult<()> {
    for rule in Rule::ALL {
        writeln!(out, "{:<36} {}", rule.code(), rule.description())?;
    }
    out.flush()?;
    Ok(())
}

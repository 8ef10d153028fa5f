//! CLI command implementations
//!
//! `validate` and `check-schema` follow the same sequence:
//! 1. resolve configuration (file, then flags)
//! 2. load metadata
//! 3. run the requested checks
//! 4. render the outcome and return the exit status

use std::io::Write;
use std::path::Path;

use crate::mapping::{MetadataLoader, MetadataRegistry};
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope, Severity};
use crate::schema_drift::{DatabaseSnapshot, SnapshotSchemaTool};
use crate::validator::{MappingValidator, TypeRegistry, ValidationReport};

use super::args::{Command, CommonArgs, OutputFormat};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_outcome, write_rules};

/// Exit status bit: the mapping has findings
pub const EXIT_MAPPING_INVALID: i32 = 1;
/// Exit status bit: the database schema is out of sync
pub const EXIT_SCHEMA_OUT_OF_SYNC: i32 = 2;

/// Result of the schema sync check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub in_sync: bool,
    pub pending_changes: Vec<String>,
}

/// Everything one command checked; `None` means skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub mapping: Option<ValidationReport>,
    pub sync: Option<SyncOutcome>,
}

impl CheckOutcome {
    /// Process exit status
    pub fn exit_code(&self) -> i32 {
        let mut code = 0;
        if self.mapping.as_ref().map_or(false, |r| !r.is_valid()) {
            code |= EXIT_MAPPING_INVALID;
        }
        if self.sync.as_ref().map_or(false, |s| !s.in_sync) {
            code |= EXIT_SCHEMA_OUT_OF_SYNC;
        }
        code
    }
}

/// Run a parsed command, writing its report to `out`.
pub fn run_command<W: Write>(command: Command, out: &mut W) -> CliResult<i32> {
    match command {
        Command::Validate {
            common,
            snapshot,
            skip_mapping,
            skip_sync,
            output,
        } => {
            let mut config = prepare(&common)?;
            config.skip_mapping |= skip_mapping;
            config.skip_sync |= skip_sync;
            if snapshot.is_some() {
                config.schema_snapshot = snapshot;
            }
            if let Some(output) = output {
                config.output = output;
            }
            validate(&config, out)
        }
        Command::CheckSchema {
            common,
            snapshot,
            output,
        } => {
            let mut config = prepare(&common)?;
            if snapshot.is_some() {
                config.schema_snapshot = snapshot;
            }
            if let Some(output) = output {
                config.output = output;
            }
            check_schema(&config, out)
        }
        Command::Rules => {
            write_rules(out)?;
            Ok(0)
        }
    }
}

/// Validate mapping and, when a snapshot is configured, schema sync.
pub fn validate<W: Write>(config: &Config, out: &mut W) -> CliResult<i32> {
    let registry = load_metadata(&config.metadata_dir)?;
    let validator =
        MappingValidator::with_types(&registry, TypeRegistry::with_custom(&config.custom_types));

    let mapping = if config.skip_mapping {
        None
    } else {
        Some(run_validation(&validator))
    };

    let sync = match (&config.schema_snapshot, config.skip_sync) {
        (Some(path), false) => Some(check_sync(&registry, path)?),
        _ => None,
    };

    finish(config.output, CheckOutcome { mapping, sync }, out)
}

/// Check schema sync only; a snapshot is required.
pub fn check_schema<W: Write>(config: &Config, out: &mut W) -> CliResult<i32> {
    let path = config.schema_snapshot.as_ref().ok_or_else(|| {
        CliError::config_error("check-schema requires --snapshot or 'schema_snapshot' in config")
    })?;

    let registry = load_metadata(&config.metadata_dir)?;
    let sync = check_sync(&registry, path)?;

    finish(
        config.output,
        CheckOutcome {
            mapping: None,
            sync: Some(sync),
        },
        out,
    )
}

fn prepare(common: &CommonArgs) -> CliResult<Config> {
    let config = Config::resolve(common)?;

    let severity = if common.quiet {
        Severity::Error
    } else {
        config.severity()?
    };
    Logger::set_min_severity(severity);

    let dir = config.metadata_dir.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("metadata_dir", dir.as_str())]);

    Ok(config)
}

fn load_metadata(dir: &Path) -> CliResult<MetadataRegistry> {
    let scope = ObservationScope::new("METADATA_LOAD");

    let registry = match MetadataLoader::new(dir).load() {
        Ok(registry) => registry,
        Err(e) => {
            scope.fail(&e.to_string());
            return Err(e.into());
        }
    };

    let count = registry.len().to_string();
    scope.complete_with_fields(&[("entities", count.as_str())]);
    log_event_with_fields(Event::MetadataLoaded, &[("entities", count.as_str())]);

    Ok(registry)
}

fn run_validation(validator: &MappingValidator<'_, MetadataRegistry>) -> ValidationReport {
    let scope = ObservationScope::new("MAPPING_VALIDATION");
    let report = validator.validate_mapping();

    let errors = report.error_count().to_string();
    scope.complete_with_fields(&[("errors", errors.as_str())]);

    report
}

fn check_sync(registry: &MetadataRegistry, path: &Path) -> CliResult<SyncOutcome> {
    let scope = ObservationScope::new("SCHEMA_SYNC");

    let snapshot = match DatabaseSnapshot::load(path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            scope.fail(&e.to_string());
            return Err(e.into());
        }
    };
    let tables = snapshot.tables.len().to_string();
    log_event_with_fields(Event::SnapshotLoaded, &[("tables", tables.as_str())]);

    let tool = SnapshotSchemaTool::new(snapshot);
    let pending_changes = MappingValidator::new(registry).pending_schema_changes(&tool)?;

    scope.complete();
    Ok(SyncOutcome {
        in_sync: pending_changes.is_empty(),
        pending_changes,
    })
}

fn finish<W: Write>(format: OutputFormat, outcome: CheckOutcome, out: &mut W) -> CliResult<i32> {
    write_outcome(out, format, &outcome)?;
    Ok(outcome.exit_code())
}

//! Configuration file
//!
//! JSON, every key optional:
//!
//! ```json
//! {
//!   "metadata_dir": "./metadata",
//!   "schema_snapshot": "./db-snapshot.json",
//!   "custom_types": ["money"],
//!   "skip_mapping": false,
//!   "skip_sync": false,
//!   "output": "text",
//!   "log_level": "warn"
//! }
//! ```
//!
//! Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::args::{CommonArgs, OutputFormat};
use super::errors::{CliError, CliResult};

/// Config file read when `--config` is not given, if it exists
pub const DEFAULT_CONFIG_PATH: &str = "./ormcheck.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory of entity descriptor files
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,

    /// Database snapshot for the schema sync check
    #[serde(default)]
    pub schema_snapshot: Option<PathBuf>,

    /// Column types accepted in addition to the built-in ones
    #[serde(default)]
    pub custom_types: Vec<String>,

    #[serde(default)]
    pub skip_mapping: bool,

    #[serde(default)]
    pub skip_sync: bool,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from("./metadata")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            schema_snapshot: None,
            custom_types: Vec::new(),
            skip_mapping: false,
            skip_sync: false,
            output: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config '{}': {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve the configuration for a command.
    ///
    /// An explicit `--config` must exist; the default path is optional.
    pub fn resolve(args: &CommonArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(dir) = &args.metadata {
            config.metadata_dir = dir.clone();
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }
        config.validate()?;

        Ok(config)
    }

    /// Minimum log severity
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;

        if self.metadata_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("metadata_dir must not be empty"));
        }

        if let Some(name) = self.custom_types.iter().find(|t| t.trim().is_empty()) {
            return Err(CliError::config_error(format!(
                "custom_types contains an empty type name: '{}'",
                name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_object() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.metadata_dir, PathBuf::from("./metadata"));
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"{"metadata_dir": "meta", "schema_snapshot": "db.json",
                "custom_types": ["money"], "skip_sync": true,
                "output": "json", "log_level": "info"}"#,
        )
        .unwrap();

        assert_eq!(config.metadata_dir, PathBuf::from("meta"));
        assert_eq!(config.schema_snapshot, Some(PathBuf::from("db.json")));
        assert_eq!(config.custom_types, vec!["money".to_string()]);
        assert!(config.skip_sync);
        assert!(!config.skip_mapping);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::parse(r#"{"log_level": "verbose"}"#).is_err());
        assert!(Config::parse(r#"{"output": "xml"}"#).is_err());
        assert!(Config::parse(r#"{"custom_types": [" "]}"#).is_err());
        assert!(Config::parse(r#"{"metadata_directory": "x"}"#).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ormcheck.json");
        fs::write(&path, r#"{"metadata_dir": "from-file", "log_level": "error"}"#).unwrap();

        let args = CommonArgs {
            config: Some(path),
            metadata: Some(PathBuf::from("from-flag")),
            log_level: None,
            quiet: false,
        };
        let config = Config::resolve(&args).unwrap();
        assert_eq!(config.metadata_dir, PathBuf::from("from-flag"));
        assert_eq!(config.log_level, "error");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let args = CommonArgs {
            config: Some(PathBuf::from("/nonexistent/ormcheck.json")),
            metadata: None,
            log_level: None,
            quiet: false,
        };
        let err = Config::resolve(&args).unwrap_err();
        assert_eq!(err.code_str(), "ORM_CLI_CONFIG_ERROR");
    }
}

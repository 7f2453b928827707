//! Configuration file support for lockwarden.
//!
//! Provides YAML-based configuration through `lockwarden.config.yml` files,
//! and the merge of config values with command-line flags.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::dto::OutputFormat;
use crate::cli::Args;
use crate::shared::error::ScanError;
use crate::shared::Result;
use crate::threat_detection::domain::Severity;

pub const CONFIG_FILENAME: &str = "lockwarden.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub ignore_packages: Option<Vec<String>>,
    pub severity_threshold: Option<String>,
    /// Threat database location; relative paths are resolved against the
    /// directory holding the config file.
    pub database: Option<PathBuf>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let mut config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    if let (Some(database), Some(base_dir)) = (config.database.as_ref(), path.parent()) {
        if database.is_relative() {
            config.database = Some(base_dir.join(database));
        }
    }

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(format) = config.format.as_deref() {
        if let Err(e) = format.parse::<OutputFormat>() {
            bail!("Invalid config: format: {}", e);
        }
    }

    if let Some(severity) = config.severity_threshold.as_deref() {
        if let Err(e) = severity.parse::<Severity>() {
            bail!("Invalid config: severity_threshold: {}", e);
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
}

/// Effective settings for one run after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub project_path: PathBuf,
    pub database_path: PathBuf,
    pub lockfile_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    /// Config patterns first, then CLI patterns
    pub ignore_patterns: Vec<String>,
    pub severity_threshold: Severity,
}

impl ScanSettings {
    /// Scalar CLI flags win over config values; ignore lists are combined.
    ///
    /// # Errors
    /// Returns an error when no database is given anywhere or a config
    /// value fails to parse.
    pub fn resolve(args: Args, config: Option<ConfigFile>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let database_path = args
            .database
            .or(config.database)
            .ok_or_else(|| ScanError::Validation {
                message: format!(
                    "No threat database specified.\n\n💡 Hint: Pass --database <FILE> or set 'database' in {}",
                    CONFIG_FILENAME
                ),
            })?;

        let format = match (args.format, config.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(raw)) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            (None, None) => OutputFormat::default(),
        };

        let severity_threshold = match (args.severity_threshold, config.severity_threshold.as_deref()) {
            (Some(severity), _) => severity,
            (None, Some(raw)) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            (None, None) => Severity::Low,
        };

        let mut ignore_patterns = config.ignore_packages.unwrap_or_default();
        ignore_patterns.extend(args.ignore);

        Ok(Self {
            project_path: args.path.unwrap_or_else(|| PathBuf::from(".")),
            database_path,
            lockfile_path: args.lockfile,
            format,
            output: args.output,
            ignore_patterns,
            severity_threshold,
        })
    }
}

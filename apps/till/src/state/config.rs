//! # Configuration State
//!
//! Stores register configuration loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`till.toml`, or the path in `TILL_CONFIG`)
//! 3. Environment variables (`TILL_*`)
//!
//! ## Example `till.toml`
//! ```toml
//! store_name = "Kiosco Central"
//! currency_symbol = "$"
//! database_path = "/var/lib/till/till.db"
//! export_dir = "/var/lib/till/exports"
//! timestamp_format = "%d/%m/%Y, %H:%M:%S"
//! report_formats = ["pdf", "xlsx"]
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use till_core::Money;
use till_db::DbConfig;
use till_export::{ExportSettings, ReportFormat};

/// Default commit timestamp rendering: `16/10/2026, 09:30:00`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

const CONFIG_FILE_NAME: &str = "till.toml";

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Config State
// =============================================================================

/// Register configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (printed on tickets and reports).
    pub store_name: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// SQLite file holding the transaction log.
    pub database_path: PathBuf,

    /// Directory reports and tickets are written to.
    pub export_dir: PathBuf,

    /// chrono format string used to stamp commits.
    pub timestamp_format: String,

    /// Formats written by "export report" and "close day".
    pub report_formats: Vec<ReportFormat>,
}

impl Default for ConfigState {
    /// Development defaults: both report formats, `$`, platform data dir.
    fn default() -> Self {
        let data_dir = default_data_dir();
        ConfigState {
            store_name: "Punto de Venta".to_string(),
            currency_symbol: "$".to_string(),
            database_path: data_dir.join("till.db"),
            export_dir: data_dir.join("exports"),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            report_formats: ReportFormat::ALL.to_vec(),
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`ConfigState::load`], reading variables through `lookup`.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| lookup("TILL_CONFIG").map(PathBuf::from))
            .or_else(default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Applies `TILL_*` overrides.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("TILL_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("TILL_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(path) = lookup("TILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("TILL_EXPORT_DIR") {
            debug!(dir = %dir, "Overriding export directory from environment");
            self.export_dir = PathBuf::from(dir);
        }

        if let Some(format) = lookup("TILL_TIMESTAMP_FORMAT") {
            self.timestamp_format = format;
        }

        if let Some(list) = lookup("TILL_REPORT_FORMATS") {
            let mut formats = Vec::new();
            for entry in list.split(',').filter(|entry| !entry.trim().is_empty()) {
                match entry.parse::<ReportFormat>() {
                    // First mention wins.
                    Ok(format) if !formats.contains(&format) => formats.push(format),
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "Ignoring report format from environment"),
                }
            }
            self.report_formats = formats;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timestamp_format.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "timestamp_format must not be empty".into(),
            ));
        }

        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid(format!(
                "timestamp_format is not a valid format string: {}",
                self.timestamp_format
            )));
        }

        if self.report_formats.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one report format is required".into(),
            ));
        }

        Ok(())
    }

    /// Creates the directories the database and exports live in.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }

    /// Database settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    /// Exporter settings for this configuration.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            output_dir: self.export_dir.clone(),
            formats: self.report_formats.clone(),
            store_name: self.store_name.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::Money;
    /// use till_lib::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

/// `till.toml` in the platform config directory.
fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Platform data directory, or the working directory when none exists.
fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "till", "register")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn missing_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        (dir, path)
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
    }

    #[test]
    fn test_defaults_when_no_file() {
        let (_dir, path) = missing_file();
        let config = ConfigState::load_with(Some(path), env(&[])).unwrap();

        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.report_formats, ReportFormat::ALL.to_vec());
        assert!(config.database_path.ends_with("till.db"));
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.toml");
        std::fs::write(
            &path,
            r#"
            store_name = "Kiosco"
            currency_symbol = "€"
            report_formats = ["xlsx"]
            "#,
        )
        .unwrap();

        let config = ConfigState::load_with(Some(path), env(&[])).unwrap();
        assert_eq!(config.store_name, "Kiosco");
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.report_formats, vec![ReportFormat::Xlsx]);
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_config_path_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "store_name = \"Desde archivo\"").unwrap();

        let config =
            ConfigState::load_with(None, env(&[("TILL_CONFIG", path.to_str().unwrap())])).unwrap();
        assert_eq!(config.store_name, "Desde archivo");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.toml");
        std::fs::write(&path, "store_name = \"File\"").unwrap();

        let config = ConfigState::load_with(
            Some(path),
            env(&[
                ("TILL_STORE_NAME", "Env"),
                ("TILL_DB_PATH", "/tmp/env.db"),
                ("TILL_EXPORT_DIR", "/tmp/env-exports"),
                ("TILL_REPORT_FORMATS", "PDF, csv"),
                ("TILL_TIMESTAMP_FORMAT", "%Y-%m-%d %H:%M"),
            ]),
        )
        .unwrap();

        assert_eq!(config.store_name, "Env");
        assert_eq!(config.database_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/env-exports"));
        assert_eq!(config.report_formats, vec![ReportFormat::Pdf]);
        assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn test_repeated_report_formats_are_kept_once() {
        let (_dir, path) = missing_file();
        let config = ConfigState::load_with(
            Some(path),
            env(&[("TILL_REPORT_FORMATS", "pdf,xlsx,pdf")]),
        )
        .unwrap();
        assert_eq!(config.report_formats, vec![ReportFormat::Pdf, ReportFormat::Xlsx]);
    }

    #[test]
    fn test_rejects_empty_formats() {
        let (_dir, path) = missing_file();
        let err = ConfigState::load_with(Some(path), env(&[("TILL_REPORT_FORMATS", "csv")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_timestamp_format() {
        let mut config = ConfigState::default();
        config.timestamp_format = "  ".to_string();
        assert!(config.validate().is_err());

        config.timestamp_format = "%Q".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.toml");
        std::fs::write(&path, "report_formats = \"pdf\"").unwrap();

        let err = ConfigState::load_with(Some(path), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_ensure_dirs_and_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigState {
            database_path: dir.path().join("data").join("till.db"),
            export_dir: dir.path().join("out"),
            ..ConfigState::default()
        };

        config.ensure_dirs().unwrap();
        assert!(dir.path().join("data").is_dir());
        assert!(dir.path().join("out").is_dir());

        let settings = config.export_settings();
        assert_eq!(settings.output_dir, dir.path().join("out"));
        assert_eq!(settings.formats, config.report_formats);
        assert_eq!(config.db_config().database_path, config.database_path);
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for drvup
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/drvup/config.toml)
//! - Environment variables
//! - CLI flags

use drvup_errors::{ConfigError, Error};
use drvup_types::{BackendKind, ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Update service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub backend: BackendKind,
    pub catalog_path: Option<PathBuf>,
}

/// Transcript and debug logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogConfig {
    pub transcript_path: Option<PathBuf>,
    #[serde(default)]
    pub debug: bool,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

// Default value functions for serde

fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("drvup").join("config.toml"))
    }

    /// Get the default sim catalog path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_catalog_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("drvup").join("catalog.toml"))
    }

    /// Get the default directory for debug log files
    ///
    /// # Errors
    ///
    /// Returns an error if the system cache directory cannot be determined.
    pub fn default_log_dir() -> Result<PathBuf, Error> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| ConfigError::NotFound {
            path: "cache directory".to_string(),
        })?;
        Ok(cache_dir.join("drvup").join("logs"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: &Option<PathBuf>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // DRVUP_OUTPUT
        if let Ok(output) = std::env::var("DRVUP_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DRVUP_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // DRVUP_COLOR
        if let Ok(color) = std::env::var("DRVUP_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DRVUP_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // DRVUP_BACKEND
        if let Ok(backend) = std::env::var("DRVUP_BACKEND") {
            self.service.backend = match backend.as_str() {
                "sim" => BackendKind::Sim,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DRVUP_BACKEND".to_string(),
                        value: backend,
                    }
                    .into())
                }
            };
        }

        // DRVUP_CATALOG
        if let Ok(catalog) = std::env::var("DRVUP_CATALOG") {
            self.service.catalog_path = Some(PathBuf::from(catalog));
        }

        // DRVUP_LOG_FILE
        if let Ok(transcript) = std::env::var("DRVUP_LOG_FILE") {
            self.log.transcript_path = Some(PathBuf::from(transcript));
        }

        Ok(())
    }

    /// Get the sim catalog path (with default)
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the system config
    /// directory cannot be determined.
    pub fn catalog_path(&self) -> Result<PathBuf, Error> {
        match &self.service.catalog_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_catalog_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_tty_output_and_sim_backend() {
        let config = Config::default();
        assert_eq!(config.general.default_output, OutputFormat::Tty);
        assert_eq!(config.general.color, ColorChoice::Auto);
        assert_eq!(config.service.backend, BackendKind::Sim);
        assert!(config.service.catalog_path.is_none());
        assert!(config.log.transcript_path.is_none());
        assert!(!config.log.debug);
    }

    #[test]
    fn partial_toml_fills_missing_sections_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [log]
            debug = true
            "#,
        )
        .unwrap();
        assert!(config.log.debug);
        assert_eq!(config.general.default_output, OutputFormat::Tty);
        assert_eq!(config.service.backend, BackendKind::Sim);
    }

    #[test]
    fn explicit_catalog_path_wins_over_default() {
        let config: Config = toml::from_str(
            r#"
            [service]
            backend = "sim"
            catalog_path = "/tmp/catalog.toml"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.catalog_path().unwrap(),
            PathBuf::from("/tmp/catalog.toml")
        );
    }
}

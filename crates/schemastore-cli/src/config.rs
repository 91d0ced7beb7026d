//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments

use crate::cli::{Cli, OutputFormat};
use crate::error::Result;
use crate::logging::LogFormat;
use schemastore::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema store settings
    pub store: StoreConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level or filter directive, used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<LogFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// A relative store root is taken relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let mut config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        if let (Some(root), Some(parent)) = (config.store.root.as_mut(), path.parent()) {
            if root.is_relative() {
                *root = parent.join(&*root);
            }
        }

        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        match Self::default_config_paths().into_iter().find(|path| path.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Default configuration file paths, in lookup order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".schemastore.yaml"),
            PathBuf::from(".schemastore.json"),
            PathBuf::from("schemastore.yaml"),
            PathBuf::from("schemastore.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let schemastore_dir = config_dir.join("schemastore");
            paths.push(schemastore_dir.join("config.yaml"));
            paths.push(schemastore_dir.join("config.json"));
        }

        paths
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(root) = &cli.root {
            self.store.root = Some(root.clone());
        }
        if let Some(format) = cli.output {
            self.output.format = format;
        }
        if cli.no_color {
            self.output.color = false;
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

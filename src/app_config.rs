use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use log::warn;

use crate::subtitle_processor::BlankLinePolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Search/replace pairs, applied in order before the other passes
    #[serde(default = "default_replacements")]
    pub replacements: Vec<Replacement>,

    /// Which cleanup passes run
    #[serde(default)]
    pub passes: PassesConfig,

    /// Parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// One case-insensitive literal substitution
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Replacement {
    // @field: Text to look for (matched case-insensitively)
    pub search: String,

    // @field: Literal replacement text
    #[serde(default)]
    pub replace: String,
}

impl Replacement {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }
}

/// Enable switches for the cleanup passes. Order is fixed regardless.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PassesConfig {
    #[serde(default = "default_true")]
    pub search_replace: bool,

    #[serde(default = "default_true")]
    pub collapse_spaces: bool,

    #[serde(default = "default_true")]
    pub trim_edges: bool,

    #[serde(default = "default_true")]
    pub capitalize: bool,
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self {
            search_replace: true,
            collapse_spaces: true,
            trim_edges: true,
            capitalize: true,
        }
    }
}

/// Configuration for caption parsing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ParserConfig {
    /// Blank-line delimiting rule
    #[serde(default)]
    pub blank_lines: BlankLinePolicy,
}

/// Configuration for the written caption file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Inserted between the input stem and the extension of generated names
    #[serde(default = "default_output_suffix")]
    pub suffix: String,

    /// Extension of generated names
    #[serde(default = "default_output_extension")]
    pub extension: String,

    /// Offer the console preview without asking
    #[serde(default)]
    pub preview: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
            extension: default_output_extension(),
            preview: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_replacements() -> Vec<Replacement> {
    vec![
        Replacement::new("space", "yiker"),
        Replacement::new("peer to peer", "peer-to-peer"),
    ]
}

fn default_output_suffix() -> String {
    "cleaned".to_string()
}

fn default_output_extension() -> String {
    "srt".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(position) = self.replacements.iter().position(|r| r.search.is_empty()) {
            return Err(anyhow!("Replacement #{} has an empty search string", position + 1));
        }

        if self.output.suffix.trim().is_empty() {
            return Err(anyhow!("Output suffix must not be empty"));
        }

        if self.output.extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Output extension must not be empty"));
        }

        Ok(())
    }

    /// Load a configuration file, or write the defaults there if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            replacements: default_replacements(),
            passes: PassesConfig::default(),
            parser: ParserConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

//! Configuration for factspan.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI)
//! 2. Environment variables (FACTSPAN_FORMAT, FACTSPAN_MAX_INPUT_BYTES)
//! 3. Config file (.factspan/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .factspan/config.yaml
//! - Falls back to ~/.factspan/config.yaml

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::InputLimits;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".factspan";
const CONFIG_FILE: &str = "config.yaml";

/// Serialization format for converted documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON array of utterances
    #[default]
    Json,
    /// YAML sequence of utterances
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => anyhow::bail!("Unknown output format: {}", other),
        }
    }
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_input_bytes: Option<u64>,
    pub max_utterances: Option<usize>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Output format for converted documents
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Input limits
    pub limits: InputLimits,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: false,
            limits: InputLimits::default(),
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file settings and environment overrides onto defaults
fn resolve_config(
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let mut config = ResolvedConfig::default();

    if let Some((path, file)) = file {
        if let Some(format) = file.output.format {
            config.format = format;
        }
        if let Some(pretty) = file.output.pretty {
            config.pretty = pretty;
        }
        if let Some(limits) = file.limits {
            if let Some(max) = limits.max_input_bytes {
                config.limits.max_input_bytes = max;
            }
            if let Some(max) = limits.max_utterances {
                config.limits.max_utterances = max;
            }
        }
        config.config_file = Some(path);
    }

    if let Some(format) = env("FACTSPAN_FORMAT") {
        config.format = format.parse::<OutputFormat>().context("Invalid FACTSPAN_FORMAT")?;
    }
    if let Some(max) = env("FACTSPAN_MAX_INPUT_BYTES") {
        config.limits.max_input_bytes = max
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid FACTSPAN_MAX_INPUT_BYTES: {}", max))?;
    }

    Ok(config)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let file = match find_config_file() {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    resolve_config(file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

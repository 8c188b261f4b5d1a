//! Extraction configuration
//!
//! Settings for the itinerary extraction service: default model, request
//! timeout, retry count and the year assumed for dates written without one.
//!
//! ## Configuration Resolution
//!
//! 1. Check for override in data dir (~/.local/share/roaming-advisor/config/extraction.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Datelike;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/extraction.toml");

/// Name of the application data directory under the platform data dir
pub const APP_DIR: &str = "roaming-advisor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Model used when the backend environment does not name one
    pub model: String,
    /// Timeout for a single extraction request
    pub timeout: Duration,
    /// Additional attempts after a failed request
    pub max_retries: u32,
    /// Year assumed for dates without one
    pub reference_year: i32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: "gemma3".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            reference_year: chrono::Local::now().year(),
        }
    }
}

impl ExtractionConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Load from `path` if it exists, otherwise the embedded defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading extraction config from {}", path.display());
            let content = fs::read_to_string(path)
                .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?;
            parse_config(&content)
        } else {
            parse_config(DEFAULT_CONFIG)
        }
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("config").join("extraction.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    defaults: Option<RawDefaults>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    reference_year: Option<i32>,
}

fn parse_config(content: &str) -> Result<ExtractionConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = ExtractionConfig::default();

    if let Some(defaults) = raw.defaults {
        if let Some(model) = defaults.model {
            config.model = model;
        }
        if let Some(timeout) = defaults.timeout_secs {
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(retries) = defaults.max_retries {
            config.max_retries = retries;
        }
        if let Some(year) = defaults.reference_year {
            config.reference_year = year;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.model, "gemma3");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.reference_year, chrono::Local::now().year());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
[defaults]
model = "llama3.2"
reference_year = 2025
"#,
        )
        .unwrap();
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.reference_year, 2025);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.model, ExtractionConfig::default().model);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(parse_config("[defaults\nmodel = ").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extraction.toml");

        // missing file falls back to embedded defaults
        let config = ExtractionConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gemma3");

        fs::write(&path, "[defaults]\ntimeout_secs = 5\nmax_retries = 0\n").unwrap();
        let config = ExtractionConfig::load_from(&path).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
    }
}

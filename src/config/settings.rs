//! TOML-based configuration.
//!
//! Supports a config file (superstore.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [dataset]
//! default_path = "${DATA_DIR}/superstore.csv"
//! encoding = "windows-1252"
//!
//! [analysis]
//! top_n = 10
//! high_discount_threshold = 0.30
//! selling_well_threshold = 1000.0
//!
//! [export]
//! output_dir = "./exports"
//! encoding = "utf-8"
//!
//! [display]
//! currency_decimals = 2
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub analysis: AnalysisSettings,
    pub export: ExportSettings,
    pub display: DisplaySettings,
}

/// Where the dataset lives and how its text is encoded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// File used when no `--file` is given (supports ${ENV_VAR} expansion).
    pub default_path: Option<String>,

    /// Encoding label for delimited text input.
    pub encoding: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            default_path: None,
            encoding: "utf-8".to_string(),
        }
    }
}

/// Thresholds of the standard summaries.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Row limit of the "top" summaries.
    pub top_n: usize,

    /// Discount above which a losing line counts as a high-discount loss.
    pub high_discount_threshold: f64,

    /// Sales above which a losing line counts as selling well.
    pub selling_well_threshold: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            high_discount_threshold: 0.30,
            selling_well_threshold: 1000.0,
        }
    }
}

/// CSV export target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory exports are written to (supports ${ENV_VAR} expansion).
    pub output_dir: String,

    /// Encoding label of the written files.
    pub encoding: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            encoding: "utf-8".to_string(),
        }
    }
}

/// Terminal rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Decimal places for Sales and Profit.
    pub currency_decimals: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_decimals: 2,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SUPERSTORE_CONFIG`
    /// 2. `./superstore.toml`
    /// 3. `~/.config/superstore/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SUPERSTORE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("superstore.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("superstore").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.analysis.top_n == 0 {
            return Err(SettingsError::InvalidConfig(
                "analysis.top_n must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.analysis.high_discount_threshold) {
            return Err(SettingsError::InvalidConfig(format!(
                "analysis.high_discount_threshold must be between 0 and 1, got {}",
                self.analysis.high_discount_threshold
            )));
        }
        Ok(())
    }

    /// The configured dataset path with environment variables expanded.
    pub fn dataset_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.dataset
            .default_path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }

    /// The export directory with environment variables expanded.
    pub fn output_dir(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.export.output_dir).map(PathBuf::from)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Lone $
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}

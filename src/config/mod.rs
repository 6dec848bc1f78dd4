//! Configuration module for the Superstore analytics tool.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, AnalysisSettings, DatasetSettings, DisplaySettings, ExportSettings, Settings,
    SettingsError,
};

//! Threshold Tuner configuration loading and validation.
//!
//! This crate provides:
//! - The scenario catalogue consumed by the tuning run
//! - Selector settings (grid resolution, search strategy)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation with field-level errors

pub mod file;
pub mod resolve;
pub mod scenario;
pub mod selector;

pub use file::{load_config_file, ConfigFormat, TunerConfig};
pub use resolve::{resolve_config, resolve_config_with, ConfigSource, ResolvedConfig, SCENARIOS_ENV};
pub use scenario::{Scenario, ScenarioCatalogue};
pub use selector::{SearchStrategy, SelectorConfig};

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("unsupported config file extension: {0} (expected .toml, .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("unsupported config schema version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for tt_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { .. } => tt_common::Error::InvalidScenarios(err.to_string()),
            other => tt_common::Error::Config(other.to_string()),
        }
    }
}

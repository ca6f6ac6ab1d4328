//! Error types for report operations.

use thiserror::Error;

/// Errors that can occur while reading or writing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// I/O error on a specific file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unserializable JSON
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Directory holds no threshold cards
    #[error("no threshold cards found in {0}")]
    NoCards(String),
}

impl ReportError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        ReportError::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<ReportError> for tt_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io { path, source } => tt_common::Error::Io(std::io::Error::new(
                source.kind(),
                format!("{path}: {source}"),
            )),
            other => tt_common::Error::Report(other.to_string()),
        }
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

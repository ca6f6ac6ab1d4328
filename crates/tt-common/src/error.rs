//! Error types for Threshold Tuner.

use thiserror::Error;

/// Result type alias for Threshold Tuner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Threshold Tuner.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid scenario catalogue: {0}")]
    InvalidScenarios(String),

    // Input errors (20-29)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid value for '{field}'{}: {reason}", row_suffix(.row))]
    Validation {
        field: String,
        row: Option<usize>,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Report errors (40-49)
    #[error("report error: {0}")]
    Report(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {r}"),
        None => String::new(),
    }
}

impl Error {
    /// Build a validation error for a named field.
    pub fn validation(
        field: impl Into<String>,
        row: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Validation {
            field: field.into(),
            row,
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidScenarios(_) => 11,
            Error::InvalidInput(_) => 20,
            Error::Validation { .. } => 21,
            Error::Csv(_) => 22,
            Error::Report(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether the error was caused by the caller's data rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::Validation { .. } | Error::Csv(_)
        )
    }
}

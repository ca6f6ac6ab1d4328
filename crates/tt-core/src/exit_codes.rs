//! Exit codes for the tt-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//! They are stable across releases.

use tt_common::Error;

/// Exit codes for tt-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Ok = 0,

    /// A selection fell back to a degenerate threshold (infeasible bound or
    /// no positives); output is still written
    Degenerate = 1,

    /// Configuration or scenario catalogue error
    ConfigError = 10,

    /// Input table or argument validation error
    InputError = 11,

    /// Malformed threshold card or empty card directory
    ReportError = 12,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            e if e.is_input_error() => ExitCode::InputError,
            Error::Config(_) | Error::InvalidScenarios(_) => ExitCode::ConfigError,
            Error::Report(_) => ExitCode::ReportError,
            Error::Io(_) => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}

//! Threshold Tuner common types and errors.
//!
//! This crate provides foundational types shared across the tt-* crates:
//! - The unified error type and result alias
//! - Output format selection for CLI commands
//! - Schema versioning for exported JSON

pub mod error;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;

//! Threshold Tuner report writers.
//!
//! - Threshold cards: the JSON export contract for a single operating point
//! - Case summaries: Markdown table built from a directory of cards
//! - Console summary lines for tuning runs
//! - Run manifests recording provenance for a tuning run

pub mod card;
pub mod console;
pub mod error;
pub mod manifest;
pub mod summary;

pub use card::{read_card, write_card, CardMetrics, ThresholdCard};
pub use console::{tuning_summary_header, tuning_summary_line};
pub use error::{ReportError, Result};
pub use manifest::{InputProvenance, ManifestCase, RunManifest, MANIFEST_FILE_NAME};
pub use summary::{collect_rows, render_markdown, write_summary, CaseSummaryRow, SUMMARY_FILE_NAME};

//! Threshold Tuner core library.
//!
//! Diagnostic metrics for a binary classifier at a decision threshold, and
//! Policy-B threshold selection: the highest threshold whose false-negative
//! count stays within a bound.
//!
//! ```no_run
//! use tt_config::SelectorConfig;
//! use tt_core::{compute_metrics, select_threshold, Sample};
//!
//! let samples = vec![Sample::positive(0.9), Sample::negative(0.1)];
//! let selection = select_threshold(&samples, 0, &SelectorConfig::default())?;
//! let metrics = compute_metrics(&samples, selection.threshold, Some(0.005))?;
//! println!("WLR {:.2}%", metrics.wlr * 100.0);
//! # Ok::<(), tt_common::Error>(())
//! ```

pub mod exit_codes;
pub mod logging;
pub mod metrics;
pub mod select;
pub mod sweep;
pub mod table;
pub mod tune;

pub use exit_codes::ExitCode;
pub use metrics::{compute_metrics, ConfusionCounts, Engine, MetricsResult};
pub use select::{count_false_negatives, select_threshold, SelectionOutcome, ThresholdSelection};
pub use sweep::{sweep, write_sweep_csv, SweepPoint};
pub use table::{load_csv, read_csv, validate_samples, CsvOptions, Sample, SampleTable};
pub use tune::{tune, CaseOutcome};

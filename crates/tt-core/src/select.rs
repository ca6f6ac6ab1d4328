//! Policy-B threshold selection.
//!
//! Picks the highest grid threshold whose false-negative count stays within
//! a bound, which maximizes workload reduction under that bound. The
//! false-negative count `FN(t) = #{positives with score < t}` is
//! non-decreasing in `t`, so the feasible thresholds form a prefix of the
//! grid and the answer is the last point of that prefix.

use serde::Serialize;
use tracing::{debug, warn};
use tt_common::{Error, Result};
use tt_config::{SearchStrategy, SelectorConfig};
use tt_math::ThresholdGrid;

use crate::table::{validate_samples, Sample};

/// How the selected threshold should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// A grid threshold satisfied the bound in a table with positives.
    Constrained,
    /// The table has no positives; every threshold satisfies the bound and
    /// the maximum grid threshold is returned.
    NoPositives,
    /// No grid threshold satisfies the bound; falls back to 0.0.
    Infeasible,
}

impl SelectionOutcome {
    pub fn is_degenerate(self) -> bool {
        self != SelectionOutcome::Constrained
    }
}

impl std::fmt::Display for SelectionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionOutcome::Constrained => write!(f, "constrained"),
            SelectionOutcome::NoPositives => write!(f, "no_positives"),
            SelectionOutcome::Infeasible => write!(f, "infeasible"),
        }
    }
}

/// Result of a Policy-B search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdSelection {
    pub threshold: f64,
    pub max_false_negatives: i64,
    /// False negatives at the selected threshold.
    pub false_negatives: usize,
    pub outcome: SelectionOutcome,
    pub grid_points: usize,
    pub strategy: SearchStrategy,
}

/// Number of positives scoring strictly below `threshold`.
pub fn count_false_negatives(samples: &[Sample], threshold: f64) -> usize {
    samples
        .iter()
        .filter(|s| s.is_positive && s.score < threshold)
        .count()
}

/// Select the highest grid threshold with at most `max_false_negatives` misses.
pub fn select_threshold(
    samples: &[Sample],
    max_false_negatives: i64,
    config: &SelectorConfig,
) -> Result<ThresholdSelection> {
    validate_samples(samples)?;
    let grid = ThresholdGrid::new(config.grid_points).ok_or_else(|| {
        Error::validation(
            "grid_points",
            None,
            format!(
                "must be between 2 and {}, got {}",
                ThresholdGrid::MAX_POINTS,
                config.grid_points
            ),
        )
    })?;

    let index = match config.strategy {
        SearchStrategy::Bisect => bisect(samples, max_false_negatives, &grid),
        SearchStrategy::Sweep => sweep(samples, max_false_negatives, &grid),
    };
    let has_positives = samples.iter().any(|s| s.is_positive);

    let (threshold, outcome) = match index {
        None => (0.0, SelectionOutcome::Infeasible),
        Some(i) if !has_positives => (grid.value(i), SelectionOutcome::NoPositives),
        Some(i) => (grid.value(i), SelectionOutcome::Constrained),
    };
    let false_negatives = count_false_negatives(samples, threshold);

    match outcome {
        SelectionOutcome::Constrained => debug!(
            threshold,
            false_negatives,
            max_false_negatives,
            strategy = %config.strategy,
            "threshold selected"
        ),
        SelectionOutcome::NoPositives => warn!(
            threshold,
            "no positive samples; every threshold satisfies the bound"
        ),
        SelectionOutcome::Infeasible => warn!(
            max_false_negatives,
            "no grid threshold satisfies the false-negative bound; falling back to 0.0"
        ),
    }

    Ok(ThresholdSelection {
        threshold,
        max_false_negatives,
        false_negatives,
        outcome,
        grid_points: grid.len(),
        strategy: config.strategy,
    })
}

/// O(N log N + log G): with positives sorted ascending, `FN(t) <= k` holds
/// exactly when the (k+1)-th smallest positive score is `>= t`.
fn bisect(samples: &[Sample], max_false_negatives: i64, grid: &ThresholdGrid) -> Option<usize> {
    let k = usize::try_from(max_false_negatives).ok()?;
    let mut positives: Vec<f64> = samples
        .iter()
        .filter(|s| s.is_positive)
        .map(|s| s.score)
        .collect();
    if k >= positives.len() {
        return Some(grid.len() - 1);
    }
    let (_, bound, _) = positives.select_nth_unstable_by(k, f64::total_cmp);
    grid.last_at_or_below(*bound)
}

/// O(G * N) reference scan; keeps going after the first feasible point.
fn sweep(samples: &[Sample], max_false_negatives: i64, grid: &ThresholdGrid) -> Option<usize> {
    let mut best = None;
    for (i, t) in grid.iter().enumerate() {
        let fn_count = count_false_negatives(samples, t) as i64;
        if fn_count <= max_false_negatives {
            best = Some(i);
        }
    }
    best
}

//! Decision-curve analysis helpers.

use super::stable::safe_ratio;

/// Threshold substituted into the odds term when the decision threshold is
/// not strictly inside (0, 1).
pub const BOUNDARY_ODDS_THRESHOLD: f64 = 0.5;

/// Threshold odds `t / (1 - t)` used to weigh false positives against true positives.
///
/// Thresholds at or beyond the unit-interval boundary have no finite odds;
/// they are evaluated at [`BOUNDARY_ODDS_THRESHOLD`] instead.
pub fn threshold_odds(threshold: f64) -> f64 {
    let t = if threshold > 0.0 && threshold < 1.0 {
        threshold
    } else {
        BOUNDARY_ODDS_THRESHOLD
    };
    t / (1.0 - t)
}

/// Net benefit of treating predicted positives at `threshold`:
/// `TP/N - FP/N * t/(1-t)`.
pub fn net_benefit(tp: usize, fp: usize, n: usize, threshold: f64) -> f64 {
    safe_ratio(tp, n) - safe_ratio(fp, n) * threshold_odds(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_example() {
        // N=100, TP=10, FP=5, t=0.3 -> 0.10 - 0.05 * (0.3 / 0.7)
        let nb = net_benefit(10, 5, 100, 0.3);
        assert!((nb - 0.078_571_428_571).abs() < 1e-9);
    }

    #[test]
    fn boundary_thresholds_use_even_odds() {
        assert!((threshold_odds(0.0) - 1.0).abs() < 1e-15);
        assert!((threshold_odds(1.0) - 1.0).abs() < 1e-15);
        assert!((threshold_odds(-3.0) - 1.0).abs() < 1e-15);
        assert!((threshold_odds(7.5) - 1.0).abs() < 1e-15);
        assert!((net_benefit(10, 5, 100, 0.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn interior_odds() {
        assert!((threshold_odds(0.2) - 0.25).abs() < 1e-12);
        assert!((threshold_odds(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_population_is_zero() {
        assert_eq!(net_benefit(0, 0, 0, 0.3), 0.0);
    }
}

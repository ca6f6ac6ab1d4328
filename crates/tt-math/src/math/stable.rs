//! Count ratios that never produce NaN for empty denominators.

/// Ratio of two counts, defined as `0.0` when the denominator is zero.
///
/// Confusion-matrix rates at degenerate thresholds (no predicted positives,
/// no actual negatives, ...) resolve to zero rather than NaN.
#[inline]
pub fn safe_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

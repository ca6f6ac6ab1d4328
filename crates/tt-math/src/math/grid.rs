//! Evenly spaced threshold grids over the unit interval.

use serde::Serialize;

/// `points` thresholds evenly spaced on `[0, 1]`, both endpoints included.
///
/// Point `i` is `i * (1 / (points - 1))`; the last point is exactly `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdGrid {
    points: usize,
}

impl ThresholdGrid {
    /// Resolution used by the Policy-B selector (step 0.0002).
    pub const SELECTION_POINTS: usize = 5001;
    /// Resolution used for trade-off sweeps (step 0.002).
    pub const SWEEP_POINTS: usize = 501;
    /// Finest supported resolution (step 1e-6).
    pub const MAX_POINTS: usize = 1_000_001;

    /// Returns `None` unless `2 <= points <= MAX_POINTS`.
    pub fn new(points: usize) -> Option<Self> {
        (2..=Self::MAX_POINTS)
            .contains(&points)
            .then_some(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn step(&self) -> f64 {
        1.0 / (self.points - 1) as f64
    }

    /// Threshold at index `i`. Indices past the end clamp to `1.0`.
    pub fn value(&self, i: usize) -> f64 {
        if i + 1 >= self.points {
            1.0
        } else {
            i as f64 * self.step()
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        (0..self.points).map(move |i| self.value(i))
    }

    /// Index of the largest grid threshold `<= bound`, or `None` if every
    /// grid threshold exceeds it.
    pub fn last_at_or_below(&self, bound: f64) -> Option<usize> {
        let (mut lo, mut hi) = (0usize, self.points);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.value(mid) <= bound {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.checked_sub(1)
    }
}

impl Default for ThresholdGrid {
    fn default() -> Self {
        Self {
            points: Self::SELECTION_POINTS,
        }
    }
}

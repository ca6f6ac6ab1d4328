//! Threshold-independent ranking metrics: AUROC and average precision.
//!
//! Both metrics need at least one positive and one negative sample. When
//! either class is missing they are undefined and reported as NaN so callers
//! can suppress them instead of mistaking them for real scores.

use serde::Serialize;
use std::cmp::Ordering;

/// Ranking-quality scores over a full score distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingMetrics {
    /// Area under the ROC curve (NaN when only one class is present).
    pub auc: f64,
    /// Area under the precision-recall curve as average precision
    /// (NaN when only one class is present).
    pub auprc: f64,
}

impl RankingMetrics {
    /// Sentinel for single-class tables.
    pub const UNDEFINED: RankingMetrics = RankingMetrics {
        auc: f64::NAN,
        auprc: f64::NAN,
    };

    /// Compute both metrics from `(score, is_positive)` pairs.
    pub fn compute<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let mut ranked: Vec<(f64, bool)> = points.into_iter().collect();
        let n_pos = ranked.iter().filter(|(_, p)| *p).count();
        let n_neg = ranked.len() - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Self::UNDEFINED;
        }
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            auc: auroc_sorted(&ranked, n_pos, n_neg),
            auprc: average_precision_sorted(&ranked, n_pos),
        }
    }

    /// Whether the metrics are defined (both classes were present).
    pub fn is_defined(&self) -> bool {
        !self.auc.is_nan()
    }
}

/// Area under the ROC curve.
///
/// Mann-Whitney U statistic with average ranks for tied scores, which equals
/// the trapezoidal area under the empirical ROC curve.
pub fn auroc<I>(points: I) -> f64
where
    I: IntoIterator<Item = (f64, bool)>,
{
    RankingMetrics::compute(points).auc
}

/// Average precision: `sum_k (R_k - R_{k-1}) * P_k` over distinct score cut points.
pub fn average_precision<I>(points: I) -> f64
where
    I: IntoIterator<Item = (f64, bool)>,
{
    RankingMetrics::compute(points).auprc
}

/// `ranked` must be sorted ascending by score.
fn auroc_sorted(ranked: &[(f64, bool)], n_pos: usize, n_neg: usize) -> f64 {
    let mut sum_rank_pos = 0.0_f64;
    let mut start = 0usize;
    while start < ranked.len() {
        let end = tie_group_end(ranked, start);
        let avg_rank = ((start + 1 + end) as f64) * 0.5;
        let group_pos = ranked[start..end].iter().filter(|(_, p)| *p).count();
        sum_rank_pos += avg_rank * group_pos as f64;
        start = end;
    }

    let n_pos_f = n_pos as f64;
    let n_neg_f = n_neg as f64;
    (sum_rank_pos - n_pos_f * (n_pos_f + 1.0) * 0.5) / (n_pos_f * n_neg_f)
}

/// `ranked` must be sorted ascending by score; cut points are walked from the top.
fn average_precision_sorted(ranked: &[(f64, bool)], n_pos: usize) -> f64 {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut prev_recall = 0.0_f64;
    let mut ap = 0.0_f64;

    let mut end = ranked.len();
    while end > 0 {
        let start = tie_group_start(ranked, end);
        for (_, is_pos) in &ranked[start..end] {
            if *is_pos {
                tp += 1;
            } else {
                fp += 1;
            }
        }
        let precision = tp as f64 / (tp + fp) as f64;
        let recall = tp as f64 / n_pos as f64;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
        end = start;
    }
    ap
}

fn tie_group_end(ranked: &[(f64, bool)], start: usize) -> usize {
    let mut end = start + 1;
    while end < ranked.len() && ranked[end].0.total_cmp(&ranked[start].0) == Ordering::Equal {
        end += 1;
    }
    end
}

fn tie_group_start(ranked: &[(f64, bool)], end: usize) -> usize {
    let mut start = end - 1;
    while start > 0 && ranked[start - 1].0.total_cmp(&ranked[end - 1].0) == Ordering::Equal {
        start -= 1;
    }
    start
}

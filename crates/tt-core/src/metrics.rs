//! Diagnostic metrics at a decision threshold.
//!
//! A sample is predicted positive iff `score >= threshold`; ties at the
//! threshold count as positive predictions. Rates whose denominator is zero
//! are reported as `0.0`. AUROC and AUPRC are computed over the whole table,
//! independent of the threshold, and are NaN when only one class is present.

use serde::Serialize;
use tracing::{debug, warn};
use tt_common::{Error, Result};
use tt_math::{net_benefit, safe_ratio, RankingMetrics};
use tt_report::{CardMetrics, ThresholdCard};

use crate::table::{validate_samples, Sample};

/// Confusion counts at a threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    pub fn at_threshold(samples: &[Sample], threshold: f64) -> Self {
        let mut counts = Self::default();
        for sample in samples {
            match (sample.is_positive, sample.score >= threshold) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn actual_positives(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    pub fn predicted_negatives(&self) -> usize {
        self.true_negatives + self.false_negatives
    }
}

/// Metrics for one `(table, threshold, assumed prevalence)` evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsResult {
    pub threshold: f64,
    /// Caller-supplied prevalence, or the table's positive fraction.
    pub prevalence_assumed: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    pub sensitivity: f64,
    pub specificity: f64,
    /// False-negative rate.
    pub fnr: f64,
    /// Workload-reduction rate: fraction of the table predicted negative.
    pub wlr: f64,
    pub ppv: f64,
    pub npv: f64,
    pub auc: f64,
    pub auprc: f64,
    pub net_benefit: f64,
}

impl MetricsResult {
    pub fn counts(&self) -> ConfusionCounts {
        ConfusionCounts {
            true_positives: self.true_positives,
            false_positives: self.false_positives,
            true_negatives: self.true_negatives,
            false_negatives: self.false_negatives,
        }
    }

    /// Table size the metrics were computed over.
    pub fn population(&self) -> usize {
        self.counts().total()
    }

    pub fn ranking_defined(&self) -> bool {
        !self.auc.is_nan()
    }

    /// Export record with the fixed card field names.
    pub fn to_card(&self) -> ThresholdCard {
        ThresholdCard {
            threshold: self.threshold,
            assumed_prevalence: self.prevalence_assumed,
            metrics: CardMetrics {
                tp: self.true_positives,
                fp: self.false_positives,
                tn: self.true_negatives,
                fn_count: self.false_negatives,
                sensitivity: self.sensitivity,
                specificity: self.specificity,
                fnr: self.fnr,
                wlr: self.wlr,
                ppv: self.ppv,
                npv: self.npv,
                auc: self.auc,
                auprc: self.auprc,
                net_benefit: self.net_benefit,
            },
        }
    }
}

/// Evaluates metrics at arbitrary thresholds over one validated table.
///
/// Ranking metrics and the empirical prevalence are computed once at
/// construction, so each [`Engine::evaluate`] call is a single O(N) pass.
#[derive(Debug, Clone)]
pub struct Engine<'a> {
    samples: &'a [Sample],
    ranking: RankingMetrics,
    empirical_prevalence: f64,
}

impl<'a> Engine<'a> {
    pub fn new(samples: &'a [Sample]) -> Result<Self> {
        validate_samples(samples)?;
        let positives = samples.iter().filter(|s| s.is_positive).count();
        let ranking = RankingMetrics::compute(samples.iter().map(|s| (s.score, s.is_positive)));
        if ranking.is_defined() {
            debug!(
                n = samples.len(),
                positives,
                auc = ranking.auc,
                auprc = ranking.auprc,
                "ranking metrics computed"
            );
        } else {
            warn!(
                n = samples.len(),
                positives,
                "only one label class present; AUROC and AUPRC are undefined"
            );
        }
        Ok(Self {
            samples,
            ranking,
            empirical_prevalence: safe_ratio(positives, samples.len()),
        })
    }

    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    pub fn ranking(&self) -> RankingMetrics {
        self.ranking
    }

    /// Fraction of positive labels in the table.
    pub fn empirical_prevalence(&self) -> f64 {
        self.empirical_prevalence
    }

    /// Metrics at `threshold`.
    ///
    /// Any finite threshold is accepted; values outside `[0, 1]` classify
    /// every sample the same way.
    pub fn evaluate(
        &self,
        threshold: f64,
        assumed_prevalence: Option<f64>,
    ) -> Result<MetricsResult> {
        if !threshold.is_finite() {
            return Err(Error::validation(
                "threshold",
                None,
                format!("must be a finite number, got {threshold}"),
            ));
        }
        let prevalence_assumed = match assumed_prevalence {
            Some(p) if !p.is_finite() || !(0.0..=1.0).contains(&p) => {
                return Err(Error::validation(
                    "assumed_prevalence",
                    None,
                    format!("must be within [0, 1], got {p}"),
                ));
            }
            Some(p) => p,
            None => self.empirical_prevalence,
        };

        let c = ConfusionCounts::at_threshold(self.samples, threshold);
        let n = c.total();
        debug_assert_eq!(n, self.samples.len());

        Ok(MetricsResult {
            threshold,
            prevalence_assumed,
            true_positives: c.true_positives,
            false_positives: c.false_positives,
            true_negatives: c.true_negatives,
            false_negatives: c.false_negatives,
            sensitivity: safe_ratio(c.true_positives, c.actual_positives()),
            specificity: safe_ratio(c.true_negatives, c.true_negatives + c.false_positives),
            fnr: safe_ratio(c.false_negatives, c.actual_positives()),
            wlr: safe_ratio(c.predicted_negatives(), n),
            ppv: safe_ratio(c.true_positives, c.true_positives + c.false_positives),
            npv: safe_ratio(c.true_negatives, c.predicted_negatives()),
            auc: self.ranking.auc,
            auprc: self.ranking.auprc,
            net_benefit: net_benefit(c.true_positives, c.false_positives, n, threshold),
        })
    }
}

/// One-shot metrics computation.
///
/// Fails with `InvalidInput` on an empty table and with a validation error
/// naming `score`, `threshold` or `assumed_prevalence` on malformed values.
pub fn compute_metrics(
    samples: &[Sample],
    threshold: f64,
    assumed_prevalence: Option<f64>,
) -> Result<MetricsResult> {
    Engine::new(samples)?.evaluate(threshold, assumed_prevalence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// 3 positives at [0.2, 0.6, 0.9], 7 negatives below 0.5.
    fn reference_table() -> Vec<Sample> {
        let mut samples = vec![
            Sample::positive(0.2),
            Sample::positive(0.6),
            Sample::positive(0.9),
        ];
        samples.extend(
            [0.05, 0.1, 0.15, 0.25, 0.3, 0.35, 0.45]
                .iter()
                .map(|&s| Sample::negative(s)),
        );
        samples
    }

    #[test]
    fn counts_and_rates_at_midpoint() {
        let m = compute_metrics(&reference_table(), 0.5, None).unwrap();
        assert_eq!(m.true_positives, 2);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.false_positives, 0);
        assert_eq!(m.true_negatives, 7);
        assert_eq!(m.population(), 10);
        assert!(approx_eq(m.sensitivity, 2.0 / 3.0));
        assert!(approx_eq(m.specificity, 1.0));
        assert!(approx_eq(m.fnr, 1.0 / 3.0));
        assert!(approx_eq(m.wlr, 0.8));
        assert!(approx_eq(m.ppv, 1.0));
        assert!(approx_eq(m.npv, 7.0 / 8.0));
        assert!(approx_eq(m.prevalence_assumed, 0.3));
        assert!(m.ranking_defined());
    }

    #[test]
    fn tie_at_threshold_is_positive() {
        let samples = [Sample::positive(0.4), Sample::negative(0.1)];
        let m = compute_metrics(&samples, 0.4, None).unwrap();
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_negatives, 0);

        let samples = [Sample::negative(0.4), Sample::positive(0.9)];
        let m = compute_metrics(&samples, 0.4, None).unwrap();
        assert_eq!(m.false_positives, 1);
    }

    #[test]
    fn threshold_zero_flags_everything() {
        let m = compute_metrics(&reference_table(), 0.0, None).unwrap();
        assert_eq!(m.false_negatives, 0);
        assert!(approx_eq(m.sensitivity, 1.0));
        assert!(approx_eq(m.specificity, 0.0));
        assert!(approx_eq(m.wlr, 0.0));
    }

    #[test]
    fn threshold_above_max_clears_everything() {
        let m = compute_metrics(&reference_table(), 1.5, None).unwrap();
        assert_eq!(m.true_positives + m.false_positives, 0);
        assert!(approx_eq(m.sensitivity, 0.0));
        assert!(approx_eq(m.wlr, 1.0));
        // No predicted positives: PPV falls back to zero.
        assert_eq!(m.ppv, 0.0);
    }

    #[test]
    fn all_negative_table_uses_safe_division() {
        let samples: Vec<Sample> = [0.1, 0.5, 0.9]
            .iter()
            .map(|&s| Sample::negative(s))
            .collect();
        let m = compute_metrics(&samples, 0.3, None).unwrap();
        assert_eq!(m.sensitivity, 0.0);
        assert_eq!(m.fnr, 0.0);
        assert_eq!(m.ppv, 0.0);
        assert!(!m.sensitivity.is_nan());
        assert!(m.auc.is_nan());
        assert!(m.auprc.is_nan());
        assert_eq!(m.prevalence_assumed, 0.0);
    }

    #[test]
    fn all_positive_table_has_undefined_ranking() {
        let samples = [Sample::positive(0.2), Sample::positive(0.7)];
        let m = compute_metrics(&samples, 0.5, None).unwrap();
        assert!(!m.ranking_defined());
        assert!(m.auprc.is_nan());
        assert_eq!(m.specificity, 0.0);
    }

    #[test]
    fn net_benefit_reference_value() {
        // N=100 with TP=10 and FP=5 at t=0.3.
        let mut samples = Vec::new();
        samples.extend(std::iter::repeat(Sample::positive(0.8)).take(10));
        samples.extend(std::iter::repeat(Sample::negative(0.5)).take(5));
        samples.extend(std::iter::repeat(Sample::negative(0.1)).take(85));
        let m = compute_metrics(&samples, 0.3, None).unwrap();
        assert_eq!((m.true_positives, m.false_positives), (10, 5));
        assert!((m.net_benefit - 0.0786).abs() < 1e-4);
        assert!(approx_eq(m.net_benefit, 0.10 - 0.05 * (0.3 / 0.7)));
    }

    #[test]
    fn net_benefit_boundary_threshold_uses_even_odds() {
        let m = compute_metrics(&reference_table(), 0.0, None).unwrap();
        // TP=3, FP=7, N=10, odds term evaluated at 0.5.
        assert!(approx_eq(m.net_benefit, 0.3 - 0.7));
    }

    #[test]
    fn ranking_independent_of_threshold() {
        let samples = reference_table();
        let engine = Engine::new(&samples).unwrap();
        let a = engine.evaluate(0.1, None).unwrap();
        let b = engine.evaluate(0.95, None).unwrap();
        assert_eq!(a.auc, b.auc);
        assert_eq!(a.auprc, b.auprc);
        // 21 positive/negative pairs, the positive at 0.2 loses to four negatives.
        assert!(approx_eq(a.auc, 17.0 / 21.0));
    }

    #[test]
    fn supplied_prevalence_is_reported() {
        let m = compute_metrics(&reference_table(), 0.5, Some(0.005)).unwrap();
        assert_eq!(m.prevalence_assumed, 0.005);
    }

    #[test]
    fn empty_table_is_invalid_input() {
        let err = compute_metrics(&[], 0.5, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn malformed_values_are_named() {
        let err = compute_metrics(&[Sample::positive(f64::NAN)], 0.5, None).unwrap_err();
        assert!(err.to_string().contains("'score' at row 1"), "{err}");

        let err = compute_metrics(&reference_table(), f64::NAN, None).unwrap_err();
        assert!(err.to_string().contains("'threshold'"));
        assert_eq!(err.code(), 21);

        let err = compute_metrics(&reference_table(), 0.5, Some(2.0)).unwrap_err();
        assert!(err.to_string().contains("'assumed_prevalence'"));
        assert_eq!(err.code(), 21);

        let err = compute_metrics(&reference_table(), f64::INFINITY, None).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn card_uses_export_names() {
        let card = compute_metrics(&reference_table(), 0.5, Some(0.01))
            .unwrap()
            .to_card();
        assert_eq!(card.assumed_prevalence, 0.01);
        assert_eq!(card.metrics.fn_count, 1);
        assert_eq!(card.metrics.tn, 7);
    }
}

//! Run the selector and metrics engine over a scenario catalogue.

use serde::Serialize;
use tracing::{debug, info};
use tt_common::Result;
use tt_config::{Scenario, ScenarioCatalogue, SelectorConfig};

use crate::metrics::{Engine, MetricsResult};
use crate::select::{select_threshold, ThresholdSelection};
use crate::table::Sample;

/// Selection and metrics for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub scenario: Scenario,
    pub selection: ThresholdSelection,
    /// Metrics at the selected threshold under the scenario's prevalence.
    pub metrics: MetricsResult,
}

impl CaseOutcome {
    pub fn name(&self) -> &str {
        &self.scenario.name
    }
}

/// Tune every scenario in `catalogue`, in catalogue order.
pub fn tune(
    samples: &[Sample],
    catalogue: &ScenarioCatalogue,
    config: &SelectorConfig,
) -> Result<Vec<CaseOutcome>> {
    let engine = Engine::new(samples)?;
    let mut outcomes = Vec::with_capacity(catalogue.len());
    for scenario in catalogue {
        let selection = select_threshold(samples, scenario.target_false_negatives, config)?;
        let metrics = engine.evaluate(selection.threshold, Some(scenario.assumed_prevalence))?;
        debug!(
            case = %scenario.name,
            threshold = selection.threshold,
            false_negatives = metrics.false_negatives,
            outcome = %selection.outcome,
            "case tuned"
        );
        outcomes.push(CaseOutcome {
            scenario: scenario.clone(),
            selection,
            metrics,
        });
    }
    info!(cases = outcomes.len(), "tuning complete");
    Ok(outcomes)
}

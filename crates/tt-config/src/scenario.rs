//! Named tuning scenarios.
//!
//! Each scenario pairs an assumed prevalence (used only when interpreting
//! the metrics) with the false-negative bound handed to the Policy-B
//! selector. A bound of 0 is the conservative "safe" operating point; a
//! bound of 1 trades one missed positive for more workload reduction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ConfigError;

/// A single named scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name; also the stem of the exported card file.
    pub name: String,
    /// Prevalence assumed when interpreting results (0.0 to 1.0).
    pub assumed_prevalence: f64,
    /// Upper bound on false negatives at the selected threshold.
    #[serde(alias = "target_fn")]
    pub target_false_negatives: i64,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        assumed_prevalence: f64,
        target_false_negatives: i64,
    ) -> Self {
        Self {
            name: name.into(),
            assumed_prevalence,
            target_false_negatives,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigError::invalid("scenarios.name", "must not be empty"));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "scenarios.name",
                format!("'{}' must not contain path separators", self.name),
            ));
        }
        let prevalence = self.assumed_prevalence;
        if !prevalence.is_finite() || !(0.0..=1.0).contains(&prevalence) {
            return Err(ConfigError::invalid(
                format!("scenarios[{}].assumed_prevalence", self.name),
                format!("must be within [0, 1], got {prevalence}"),
            ));
        }
        Ok(())
    }
}

/// Ordered, validated list of scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScenarioCatalogue {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalogue {
    /// Validate and wrap a list of scenarios.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, ConfigError> {
        if scenarios.is_empty() {
            return Err(ConfigError::invalid("scenarios", "catalogue must not be empty"));
        }
        let mut seen = HashSet::new();
        for scenario in &scenarios {
            scenario.validate()?;
            if !seen.insert(scenario.name.as_str()) {
                return Err(ConfigError::invalid(
                    "scenarios.name",
                    format!("duplicate scenario name '{}'", scenario.name),
                ));
            }
        }
        Ok(Self { scenarios })
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalogue {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}

impl Default for ScenarioCatalogue {
    /// Low/medium/high prevalence settings, each with a safe (FN=0) and an
    /// optimal (FN<=1) variant, plus efficiency and conservative presets.
    fn default() -> Self {
        Self {
            scenarios: vec![
                Scenario::new("caseL_safe", 0.005, 0),
                Scenario::new("caseL_optimal", 0.005, 1),
                Scenario::new("caseM_safe", 0.015, 0),
                Scenario::new("caseM_optimal", 0.015, 1),
                Scenario::new("caseH_safe", 0.040, 0),
                Scenario::new("caseH_optimal", 0.040, 1),
                Scenario::new("caseE_efficiency", 0.007, 1),
                Scenario::new("caseQ_conservative", 0.005, 0),
            ],
        }
    }
}

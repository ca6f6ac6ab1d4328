//! Run manifest written alongside the threshold cards of a tuning run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "run_manifest.json";

/// Where the sample table came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputProvenance {
    /// Path of the CSV as given on the command line.
    pub path: String,
    /// SHA-256 of the CSV bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    pub rows: usize,
    pub positives: usize,
}

/// Per-scenario entry in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestCase {
    pub name: String,
    pub card_file: String,
    pub assumed_prevalence: f64,
    pub target_false_negatives: i64,
    pub threshold: f64,
    pub false_negatives: usize,
    /// `constrained`, `no_positives` or `infeasible`.
    pub outcome: String,
}

/// Provenance and outcome summary for one tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub input: InputProvenance,
    pub grid_points: usize,
    pub strategy: String,
    pub config_source: String,
    pub cases: Vec<ManifestCase>,
}

impl RunManifest {
    pub fn new(
        input: InputProvenance,
        grid_points: usize,
        strategy: impl Into<String>,
        config_source: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: tt_common::SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            input,
            grid_points,
            strategy: strategy.into(),
            config_source: config_source.into(),
            cases: Vec::new(),
        }
    }

    pub fn push_case(&mut self, case: ManifestCase) {
        self.cases.push(case);
    }

    /// Whether any case fell back to a degenerate selection.
    pub fn has_degenerate_cases(&self) -> bool {
        self.cases.iter().any(|c| c.outcome != "constrained")
    }

    /// Write to `<dir>/run_manifest.json`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;
        let path = dir.join(MANIFEST_FILE_NAME);
        let json = serde_json::to_string_pretty(self).map_err(|e| ReportError::json(&path, e))?;
        std::fs::write(&path, json).map_err(|e| ReportError::io(&path, e))?;
        Ok(path)
    }

    pub fn read_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let content = std::fs::read_to_string(&path).map_err(|e| ReportError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| ReportError::json(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> RunManifest {
        let mut m = RunManifest::new(
            InputProvenance {
                path: "data/preds.csv".into(),
                sha256: Some("ab".repeat(32)),
                rows: 100,
                positives: 4,
            },
            5001,
            "bisect",
            "builtin",
        );
        m.push_case(ManifestCase {
            name: "caseL_safe".into(),
            card_file: "caseL_safe.json".into(),
            assumed_prevalence: 0.005,
            target_false_negatives: 0,
            threshold: 0.25,
            false_negatives: 0,
            outcome: "constrained".into(),
        });
        m
    }

    #[test]
    fn roundtrip_through_dir() {
        let dir = tempfile::tempdir().unwrap();
        let m = manifest();
        let path = m.write_to_dir(dir.path()).unwrap();
        assert!(path.ends_with(MANIFEST_FILE_NAME));
        let back = RunManifest::read_from_dir(dir.path()).unwrap();
        assert_eq!(back.cases, m.cases);
        assert_eq!(back.schema_version, tt_common::SCHEMA_VERSION);
        assert_eq!(back.generated_at, m.generated_at);
    }

    #[test]
    fn degenerate_detection() {
        let mut m = manifest();
        assert!(!m.has_degenerate_cases());
        m.cases[0].outcome = "infeasible".into();
        assert!(m.has_degenerate_cases());
    }

    #[test]
    fn missing_hash_is_omitted() {
        let mut m = manifest();
        m.input.sha256 = None;
        let json = serde_json::to_value(&m).unwrap();
        assert!(json["input"].get("sha256").is_none());
    }
}

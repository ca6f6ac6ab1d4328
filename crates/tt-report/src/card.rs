//! Threshold cards.
//!
//! A card is the export record for one operating point. Its field names are
//! an interchange contract with downstream summarizers and must not change:
//!
//! ```json
//! {
//!   "threshold": 0.31,
//!   "assumed_prevalence": 0.005,
//!   "metrics": {
//!     "TP": 3, "FP": 12, "TN": 80, "FN": 0,
//!     "sensitivity": 1.0, "specificity": 0.87, "fnr": 0.0, "wlr": 0.84,
//!     "ppv": 0.2, "npv": 1.0, "auc": 0.97, "auprc": 0.71, "net_benefit": 0.02
//!   }
//! }
//! ```
//!
//! Undefined ranking metrics (single-class tables) are written as `null`
//! and read back as NaN. Bare `NaN` tokens, as emitted by Python's `json`
//! module, are accepted on read.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Export record for a single threshold evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCard {
    pub threshold: f64,
    pub assumed_prevalence: f64,
    pub metrics: CardMetrics,
}

/// Confusion counts and derived rates at the card's threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMetrics {
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "TN")]
    pub tn: usize,
    #[serde(rename = "FN")]
    pub fn_count: usize,
    pub sensitivity: f64,
    pub specificity: f64,
    pub fnr: f64,
    pub wlr: f64,
    pub ppv: f64,
    pub npv: f64,
    #[serde(with = "nan_as_null", default = "nan")]
    pub auc: f64,
    #[serde(with = "nan_as_null", default = "nan")]
    pub auprc: f64,
    pub net_benefit: f64,
}

fn nan() -> f64 {
    f64::NAN
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

impl ThresholdCard {
    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(&nan_tokens_to_null(json))
    }

    /// AUROC, or `None` when undefined.
    pub fn auc(&self) -> Option<f64> {
        Some(self.metrics.auc).filter(|v| !v.is_nan())
    }
}

/// Rewrite bare `NaN` tokens to `null`. String contents are left untouched.
fn nan_tokens_to_null(json: &str) -> Cow<'_, str> {
    if !json.contains("NaN") {
        return Cow::Borrowed(json);
    }
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = json.char_indices();
    while let Some((i, c)) = chars.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if json[i..].starts_with("NaN") {
            out.push_str("null");
            chars.nth(1);
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Write a card to `path`, creating parent directories as needed.
pub fn write_card(path: &Path, card: &ThresholdCard) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    let json = card.to_json().map_err(|e| ReportError::json(path, e))?;
    std::fs::write(path, json).map_err(|e| ReportError::io(path, e))?;
    tracing::debug!(path = %path.display(), threshold = card.threshold, "threshold card written");
    Ok(())
}

/// Read a card from `path`.
pub fn read_card(path: &Path) -> Result<ThresholdCard> {
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    ThresholdCard::from_json(&content).map_err(|e| ReportError::json(path, e))
}

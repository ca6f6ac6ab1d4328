//! Sample tables: validated `(label, score)` rows and their CSV loader.
//!
//! Labels must be exactly 0 or 1 and scores finite values in `[0, 1]`.
//! Malformed rows are rejected with an error naming the column and the
//! 1-based data row rather than being silently coerced.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use tracing::debug;
use tt_common::{Error, Result};

/// One ground-truth label paired with a predicted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Ground truth: `true` for label 1 (condition present).
    pub is_positive: bool,
    /// Predicted probability of the positive class.
    pub score: f64,
}

impl Sample {
    pub fn new(is_positive: bool, score: f64) -> Self {
        Self { is_positive, score }
    }

    pub fn positive(score: f64) -> Self {
        Self::new(true, score)
    }

    pub fn negative(score: f64) -> Self {
        Self::new(false, score)
    }
}

/// Reject empty tables and scores that are not finite values in `[0, 1]`.
///
/// Row numbers in errors are 1-based.
pub fn validate_samples(samples: &[Sample]) -> Result<()> {
    if samples.is_empty() {
        return Err(Error::InvalidInput(
            "sample table is empty; at least one (label, score) row is required".to_string(),
        ));
    }
    for (i, sample) in samples.iter().enumerate() {
        check_score("score", sample.score, Some(i + 1))?;
    }
    Ok(())
}

fn check_score(field: &str, score: f64, row: Option<usize>) -> Result<()> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(Error::validation(
            field,
            row,
            format!("expected a probability in [0, 1], got {score}"),
        ));
    }
    Ok(())
}

/// A validated, non-empty table of samples.
#[derive(Debug, Clone)]
pub struct SampleTable {
    samples: Vec<Sample>,
    ids: Option<Vec<String>>,
    fingerprint: Option<String>,
}

impl SampleTable {
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        validate_samples(&samples)?;
        Ok(Self {
            samples,
            ids: None,
            fingerprint: None,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.samples.iter().filter(|s| s.is_positive).count()
    }

    /// Identifier column values, when the source had one.
    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    /// SHA-256 hex digest of the source bytes, when loaded from a file.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }
}

/// Column names used when reading a CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub label_column: String,
    pub score_column: String,
    /// Optional identifier column; carried along but never interpreted.
    pub id_column: Option<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            label_column: "y_true".to_string(),
            score_column: "y_score".to_string(),
            id_column: Some("study_id".to_string()),
        }
    }
}

/// Load a CSV file and fingerprint its contents.
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<SampleTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let mut table = read_csv(bytes.as_slice(), options)?;
    table.fingerprint = Some(hex::encode(Sha256::digest(&bytes)));
    debug!(
        path = %path.display(),
        rows = table.len(),
        positives = table.positives(),
        "loaded sample table"
    );
    Ok(table)
}

/// Parse a CSV with a header row from any reader.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<SampleTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let missing = |name: &str| {
        let found: Vec<&str> = headers.iter().collect();
        Error::InvalidInput(format!(
            "missing required column '{name}' (found: {})",
            found.join(", ")
        ))
    };
    let label_idx = column(&options.label_column).ok_or_else(|| missing(&options.label_column))?;
    let score_idx = column(&options.score_column).ok_or_else(|| missing(&options.score_column))?;
    let id_idx = options.id_column.as_deref().and_then(column);

    let mut samples = Vec::new();
    let mut ids = id_idx.map(|_| Vec::new());
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let label = parse_label(&options.label_column, record.get(label_idx), row)?;
        let score = parse_score(&options.score_column, record.get(score_idx), row)?;
        samples.push(Sample::new(label, score));
        if let (Some(idx), Some(ids)) = (id_idx, ids.as_mut()) {
            ids.push(record.get(idx).unwrap_or_default().to_string());
        }
    }

    if samples.is_empty() {
        return Err(Error::InvalidInput(
            "CSV contains a header but no data rows".to_string(),
        ));
    }

    Ok(SampleTable {
        samples,
        ids,
        fingerprint: None,
    })
}

fn parse_label(field: &str, raw: Option<&str>, row: usize) -> Result<bool> {
    let raw = raw.unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(v) if v == 1.0 => Ok(true),
        Ok(v) if v == 0.0 => Ok(false),
        _ => Err(Error::validation(
            field,
            Some(row),
            format!("expected label 0 or 1, got '{raw}'"),
        )),
    }
}

fn parse_score(field: &str, raw: Option<&str>, row: usize) -> Result<f64> {
    let raw = raw.unwrap_or_default();
    let score = raw.parse::<f64>().map_err(|_| {
        Error::validation(field, Some(row), format!("expected a number, got '{raw}'"))
    })?;
    check_score(field, score, Some(row))?;
    Ok(score)
}

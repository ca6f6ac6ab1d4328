//! Markdown case summaries built from a directory of threshold cards.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::card::{read_card, ThresholdCard};
use crate::error::{ReportError, Result};
use crate::manifest::MANIFEST_FILE_NAME;

/// File written next to the cards.
pub const SUMMARY_FILE_NAME: &str = "CASE_SUMMARY.md";

const HEADER: &str = "| Case | Assumed prevalence | Threshold | FN | FNR | WLR | NPV | AUROC |\n\
                      |---|---:|---:|---:|---:|---:|---:|---:|\n";

/// One row of the case summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummaryRow {
    pub name: String,
    pub assumed_prevalence: f64,
    pub threshold: f64,
    pub false_negatives: usize,
    pub fnr: f64,
    pub wlr: f64,
    pub npv: f64,
    pub auc: Option<f64>,
}

impl CaseSummaryRow {
    pub fn from_card(name: impl Into<String>, card: &ThresholdCard) -> Self {
        Self {
            name: name.into(),
            assumed_prevalence: card.assumed_prevalence,
            threshold: card.threshold,
            false_negatives: card.metrics.fn_count,
            fnr: card.metrics.fnr,
            wlr: card.metrics.wlr,
            npv: card.metrics.npv,
            auc: card.auc(),
        }
    }

    fn to_markdown(&self) -> String {
        let auc = self.auc.map(|v| format!("{v:.4}")).unwrap_or_default();
        format!(
            "| {} | {:.2}% | {:.4} | {} | {:.2}% | {:.2}% | {:.2}% | {} |",
            self.name,
            self.assumed_prevalence * 100.0,
            self.threshold,
            self.false_negatives,
            self.fnr * 100.0,
            self.wlr * 100.0,
            self.npv * 100.0,
            auc
        )
    }
}

/// Read every `*.json` card in `dir`, sorted by file name.
///
/// The run manifest is skipped; any other JSON file that is not a valid
/// card is an error naming that file.
pub fn collect_rows(dir: &Path) -> Result<Vec<CaseSummaryRow>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ReportError::io(dir, e))?;
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ReportError::io(dir, e))?.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let is_manifest = path.file_name().and_then(|n| n.to_str()) == Some(MANIFEST_FILE_NAME);
        if path.is_file() && is_json && !is_manifest {
            paths.push(path);
        }
    }
    paths.sort();

    let mut rows = Vec::with_capacity(paths.len());
    for path in &paths {
        let card = read_card(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        rows.push(CaseSummaryRow::from_card(name, &card));
    }
    debug!(dir = %dir.display(), cards = rows.len(), "collected threshold cards");
    Ok(rows)
}

/// Render rows as a Markdown table.
pub fn render_markdown(rows: &[CaseSummaryRow]) -> String {
    let lines: Vec<String> = rows.iter().map(CaseSummaryRow::to_markdown).collect();
    format!("{HEADER}{}\n", lines.join("\n"))
}

/// Collect the cards in `dir`, write `CASE_SUMMARY.md` there, and return
/// the rendered Markdown along with the written path.
pub fn write_summary(dir: &Path) -> Result<(String, PathBuf)> {
    let rows = collect_rows(dir)?;
    if rows.is_empty() {
        return Err(ReportError::NoCards(dir.display().to_string()));
    }
    let markdown = render_markdown(&rows);
    let out = dir.join(SUMMARY_FILE_NAME);
    std::fs::write(&out, &markdown).map_err(|e| ReportError::io(&out, e))?;
    Ok((markdown, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{write_card, CardMetrics};

    fn card(threshold: f64, fn_count: usize, auc: f64) -> ThresholdCard {
        ThresholdCard {
            threshold,
            assumed_prevalence: 0.005,
            metrics: CardMetrics {
                tp: 3,
                fp: 10,
                tn: 86,
                fn_count,
                sensitivity: 0.75,
                specificity: 0.9,
                fnr: 0.25,
                wlr: 0.87,
                ppv: 0.2,
                npv: 0.9885,
                auc,
                auprc: 0.5,
                net_benefit: 0.01,
            },
        }
    }

    #[test]
    fn markdown_row_format() {
        let row = CaseSummaryRow::from_card("caseL_safe", &card(0.1234, 1, 0.91234));
        let md = render_markdown(&[row]);
        assert_eq!(
            md,
            "| Case | Assumed prevalence | Threshold | FN | FNR | WLR | NPV | AUROC |\n\
             |---|---:|---:|---:|---:|---:|---:|---:|\n\
             | caseL_safe | 0.50% | 0.1234 | 1 | 25.00% | 87.00% | 98.85% | 0.9123 |\n"
        );
    }

    #[test]
    fn undefined_auc_renders_empty() {
        let row = CaseSummaryRow::from_card("x", &card(0.5, 0, f64::NAN));
        assert_eq!(row.auc, None);
        assert!(render_markdown(&[row]).ends_with("| 98.85% |  |\n"));
    }

    #[test]
    fn empty_table_is_header_only() {
        let md = render_markdown(&[]);
        assert!(md.starts_with("| Case |"));
        assert!(md.ends_with("|---:|\n\n"));
    }

    #[test]
    fn collects_sorted_cards_and_skips_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write_card(&dir.path().join("b_case.json"), &card(0.2, 0, 0.8)).unwrap();
        write_card(&dir.path().join("a_case.json"), &card(0.1, 1, 0.8)).unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "{\"not\":\"a card\"}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let rows = collect_rows(dir.path()).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a_case", "b_case"]);

        let (md, path) = write_summary(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(SUMMARY_FILE_NAME));
        assert_eq!(std::fs::read_to_string(path).unwrap(), md);
    }

    #[test]
    fn malformed_card_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        let err = collect_rows(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn empty_dir_is_an_error_for_write() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_summary(dir.path()),
            Err(ReportError::NoCards(_))
        ));
    }
}

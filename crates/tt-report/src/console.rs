//! Fixed-width console lines for tuning runs.

/// Header printed before the per-case lines.
pub fn tuning_summary_header() -> &'static str {
    "Policy B tuning complete. Summary (name, threshold, FN, FNR, WLR, NPV):"
}

/// One line per tuned case; rates are printed as percentages.
pub fn tuning_summary_line(
    name: &str,
    threshold: f64,
    false_negatives: usize,
    fnr: f64,
    wlr: f64,
    npv: f64,
) -> String {
    format!(
        "{name:<22}  thr={threshold:.4}  FN={false_negatives:>2}  \
         FNR={:>6.2}%  WLR={:>6.2}%  NPV={:>6.2}%",
        fnr * 100.0,
        wlr * 100.0,
        npv * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_layout() {
        let line = tuning_summary_line("caseL_safe", 0.1234, 0, 0.0, 0.6789, 1.0);
        assert_eq!(
            line,
            "caseL_safe              thr=0.1234  FN= 0  FNR=  0.00%  WLR= 67.89%  NPV=100.00%"
        );
    }

    #[test]
    fn long_names_are_not_truncated() {
        let line = tuning_summary_line("a_really_long_case_name_here", 1.0, 12, 0.5, 0.5, 0.5);
        assert!(line.starts_with("a_really_long_case_name_here  thr=1.0000  FN=12"));
    }
}

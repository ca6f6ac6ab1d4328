//! Trade-off sweeps: metrics across an evenly spaced threshold grid.

use serde::Serialize;
use std::io::Write;
use tracing::debug;
use tt_common::{Error, Result};
use tt_math::ThresholdGrid;

use crate::metrics::Engine;

/// Threshold-dependent metrics at one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub threshold: f64,
    pub sensitivity: f64,
    pub specificity: f64,
    pub fnr: f64,
    pub wlr: f64,
    pub ppv: f64,
    pub npv: f64,
    pub net_benefit: f64,
}

/// Evaluate `points` thresholds spaced evenly over `[0, 1]`.
pub fn sweep(engine: &Engine<'_>, points: usize) -> Result<Vec<SweepPoint>> {
    let grid = ThresholdGrid::new(points).ok_or_else(|| {
        Error::validation(
            "points",
            None,
            format!(
                "must be between 2 and {}, got {points}",
                ThresholdGrid::MAX_POINTS
            ),
        )
    })?;

    let out = grid
        .iter()
        .map(|threshold| {
            let m = engine.evaluate(threshold, None)?;
            Ok(SweepPoint {
                threshold,
                sensitivity: m.sensitivity,
                specificity: m.specificity,
                fnr: m.fnr,
                wlr: m.wlr,
                ppv: m.ppv,
                npv: m.npv,
                net_benefit: m.net_benefit,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(points = out.len(), "sweep complete");
    Ok(out)
}

/// Write sweep points as CSV with a header row.
pub fn write_sweep_csv<W: Write>(writer: W, points: &[SweepPoint]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for point in points {
        csv.serialize(point)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Sample;

    fn table() -> Vec<Sample> {
        vec![
            Sample::positive(0.2),
            Sample::positive(0.6),
            Sample::positive(0.9),
            Sample::negative(0.1),
            Sample::negative(0.3),
            Sample::negative(0.45),
        ]
    }

    #[test]
    fn covers_unit_interval() {
        let samples = table();
        let engine = Engine::new(&samples).unwrap();
        let points = sweep(&engine, ThresholdGrid::SWEEP_POINTS).unwrap();
        assert_eq!(points.len(), 501);
        assert_eq!(points[0].threshold, 0.0);
        assert_eq!(points[500].threshold, 1.0);
        assert_eq!(points[0].sensitivity, 1.0);
        assert_eq!(points[0].wlr, 0.0);
    }

    #[test]
    fn fnr_and_wlr_are_monotone() {
        let samples = table();
        let engine = Engine::new(&samples).unwrap();
        let points = sweep(&engine, 101).unwrap();
        for pair in points.windows(2) {
            assert!(pair[1].fnr >= pair[0].fnr);
            assert!(pair[1].wlr >= pair[0].wlr);
        }
    }

    #[test]
    fn rejects_single_point() {
        let samples = table();
        let engine = Engine::new(&samples).unwrap();
        let err = sweep(&engine, 1).unwrap_err();
        assert!(err.to_string().contains("'points'"));
    }

    #[test]
    fn rejects_oversized_grid_without_allocating() {
        let samples = table();
        let engine = Engine::new(&samples).unwrap();
        let err = sweep(&engine, usize::MAX).unwrap_err();
        assert_eq!(err.code(), 21);
        assert!(err.to_string().contains("'points'"));
        let err = sweep(&engine, ThresholdGrid::MAX_POINTS + 1).unwrap_err();
        assert_eq!(err.code(), 21);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let samples = table();
        let engine = Engine::new(&samples).unwrap();
        let points = sweep(&engine, 3).unwrap();
        let mut buf = Vec::new();
        write_sweep_csv(&mut buf, &points).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "threshold,sensitivity,specificity,fnr,wlr,ppv,npv,net_benefit"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("0.5,"));
    }
}

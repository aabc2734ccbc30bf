//! Sweep results table.
//!
//! ```text
//! Vertex Balance (v) | Edge Balance (e) | Edge Cut | Max Cut
//! ----------------------------------------------------------
//! 1.05 | 0.50 | 1234 | 210
//! 1.05 | 0.70 | None | None
//! ```

use super::{ParameterGrid, SweepRecord};
use crate::partlab_error::PartLabError;
use itertools::Itertools;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Rendered in place of a metric the partitioner did not report.
pub const ABSENT: &str = "None";

pub struct ResultsTable<'a> {
    labels: Vec<String>,
    records: &'a [SweepRecord],
    precision: usize,
}

impl<'a> ResultsTable<'a> {
    pub fn new(grid: &ParameterGrid, records: &'a [SweepRecord]) -> Self {
        Self {
            labels: grid.axes().iter().map(|a| a.name.clone()).collect(),
            records,
            precision: 2,
        }
    }

    /// Decimal places for parameter values.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn render(&self) -> String {
        let header = self
            .labels
            .iter()
            .map(String::as_str)
            .chain(["Edge Cut", "Max Cut"])
            .join(" | ");
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(out, "{header}");
        let _ = writeln!(out, "{}", "-".repeat(header.len()));
        for record in self.records {
            let params = record
                .point
                .params
                .iter()
                .map(|p| format!("{:.*}", self.precision, p.value))
                .join(" | ");
            let _ = writeln!(
                out,
                "{params} | {} | {}",
                metric(record.edge_cut),
                metric(record.max_cut)
            );
        }
        out
    }

    /// Write the whole table in one call, so a failed sweep never leaves a
    /// partial file behind.
    pub fn write_to(&self, path: &Path) -> Result<(), PartLabError> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

fn metric(value: Option<u64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), |v| v.to_string())
}

/// Write the records as pretty-printed JSON.
pub fn write_json(path: &Path, records: &[SweepRecord]) -> Result<(), PartLabError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{ParameterAxis, SweepRecord};

    #[test]
    fn renders_fixed_precision_and_absent_sentinel() {
        let grid = ParameterGrid::new(vec![
            ParameterAxis::new("Vertex Balance (v)", "-v", vec![1.1]),
            ParameterAxis::new("Edge Balance (e)", "-e", vec![0.5, 0.7]),
        ])
        .unwrap();
        let points = grid.points();
        let records = vec![
            SweepRecord {
                point: points[0].clone(),
                edge_cut: Some(42),
                max_cut: Some(7),
            },
            SweepRecord {
                point: points[1].clone(),
                edge_cut: None,
                max_cut: Some(3),
            },
        ];
        let text = ResultsTable::new(&grid, &records).render();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Vertex Balance (v) | Edge Balance (e) | Edge Cut | Max Cut");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[1].len(), lines[0].len());
        assert_eq!(lines[2], "1.10 | 0.50 | 42 | 7");
        assert_eq!(lines[3], "1.10 | 0.70 | None | 3");
        assert_eq!(lines.len(), 4);
    }
}

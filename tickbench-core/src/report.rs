// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report aggregator: tabulates per-trial elapsed times across sources.
//!
//! One row per trial index with every source side by side, then an `AVG:`
//! row of integer-truncating means. Deliberately nothing beyond the mean -
//! this is a minimal comparison instrument, not a statistics package.

use std::io::Write;

use crate::error::ReportError;

/// Elapsed-nanosecond samples for one clock source, in trial order.
#[derive(Debug, Clone)]
pub struct Column {
    label: &'static str,
    elapsed_ns: Vec<u64>,
}

impl Column {
    pub fn new(label: &'static str, elapsed_ns: Vec<u64>) -> Self {
        Self { label, elapsed_ns }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.elapsed_ns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed_ns.is_empty()
    }

    /// Integer-truncating arithmetic mean. Zero for an empty column.
    pub fn mean_ns(&self) -> u64 {
        if self.elapsed_ns.is_empty() {
            return 0;
        }
        let sum: u128 = self.elapsed_ns.iter().map(|&ns| ns as u128).sum();
        (sum / self.elapsed_ns.len() as u128) as u64
    }
}

/// Tabular comparison report over equal-length columns.
#[derive(Debug, Default)]
pub struct Report {
    columns: Vec<Column>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    fn trial_count(&self) -> Result<usize, ReportError> {
        let expected = self.columns.first().map_or(0, Column::len);
        for col in &self.columns {
            if col.len() != expected {
                return Err(ReportError::ColumnLengthMismatch {
                    label: col.label,
                    len: col.len(),
                    expected,
                });
            }
        }
        Ok(expected)
    }

    /// Render the fixed-width table: header, one row per trial, blank line,
    /// `AVG:` row. Row order matches trial order.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        let trials = self.trial_count()?;

        write!(out, "ITER")?;
        for col in &self.columns {
            write!(out, "  {:>12}", col.label)?;
        }
        writeln!(out)?;

        for i in 0..trials {
            write!(out, "{:>4}", i)?;
            for col in &self.columns {
                write!(out, "  {:>12}", col.elapsed_ns[i])?;
            }
            writeln!(out)?;
        }

        write!(out, "\nAVG:")?;
        for col in &self.columns {
            write!(out, "  {:>12}", col.mean_ns())?;
        }
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    fn render_to_string(report: &Report) -> String {
        let mut buf = Vec::new();
        report.render(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_mean_truncates() {
        let col = Column::new("MGET", vec![5_000_100_000, 4_999_950_000]);
        assert_eq!(col.mean_ns(), 5_000_025_000);

        // Truncating division, not rounding.
        let odd = Column::new("MGET", vec![3, 4]);
        assert_eq!(odd.mean_ns(), 3);
    }

    #[test]
    fn test_empty_column_mean() {
        assert_eq!(Column::new("RGET", vec![]).mean_ns(), 0);
    }

    #[test]
    fn test_header_layout() {
        let mut report = Report::new();
        for label in ["RGET", "MGET", "TOD", "SYSC", "STDC", "MACH"] {
            report.push(Column::new(label, vec![1]));
        }
        let rendered = render_to_string(&report);
        let header = rendered.lines().next().unwrap();
        assert_eq!(
            header,
            "ITER          RGET          MGET           TOD          SYSC          STDC          MACH"
        );
    }

    #[test]
    fn test_row_order_and_avg_row() {
        let mut report = Report::new();
        report.push(Column::new("RGET", vec![5_000_100_000, 4_999_950_000]));
        report.push(Column::new("MACH", vec![5_000_000_004, 5_000_000_000]));

        let rendered = render_to_string(&report);
        let lines: Vec<&str> = rendered.lines().collect();
        // header, 2 trial rows, blank separator, AVG
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "   0    5000100000    5000000004");
        assert_eq!(lines[2], "   1    4999950000    5000000000");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "AVG:    5000025000    5000000002");
    }

    #[test]
    fn test_column_length_mismatch() {
        let mut report = Report::new();
        report.push(Column::new("RGET", vec![1, 2]));
        report.push(Column::new("MGET", vec![1]));
        let err = report.render(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::ColumnLengthMismatch { label: "MGET", .. }
        ));
    }

    #[test]
    fn test_empty_report() {
        let rendered = render_to_string(&Report::new());
        assert_eq!(rendered, "ITER\n\nAVG:\n");
    }
}

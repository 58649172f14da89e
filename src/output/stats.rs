//! Statistics over an exported table
//!
//! This module provides the end-of-run summary of a scraped table: its
//! shape, how many cells are empty and how many rows repeat.

use crate::output::Table;
use std::collections::HashSet;

/// Table statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    /// Number of data rows
    pub rows: usize,

    /// Number of columns
    pub columns: usize,

    /// Number of empty cells
    pub missing_values: usize,

    /// Number of rows identical to an earlier row
    pub duplicate_rows: usize,
}

impl TableStats {
    /// Computes statistics for a table
    pub fn compute(table: &Table) -> Self {
        let missing_values = table
            .rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_empty())
            .count();

        let mut seen = HashSet::new();
        let duplicate_rows = table
            .rows
            .iter()
            .filter(|row| !seen.insert(row.as_slice()))
            .count();

        Self {
            rows: table.rows.len(),
            columns: table.header.len(),
            missing_values,
            duplicate_rows,
        }
    }

    /// Share of empty cells, in percent
    pub fn missing_percentage(&self) -> f64 {
        let cells = self.rows * self.columns;
        if cells > 0 {
            (self.missing_values as f64 / cells as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_table_stats(title: &str, stats: &TableStats) {
    println!("=== {} ===", title);
    println!("  Rows: {}", stats.rows);
    println!("  Columns: {}", stats.columns);
    println!(
        "  Missing values: {} ({:.1}%)",
        stats.missing_values,
        stats.missing_percentage()
    );
    println!("  Duplicate rows: {}", stats.duplicate_rows);
    println!();
}

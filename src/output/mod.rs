//! Output module for exporting scraped tables
//!
//! This module handles:
//! - Assembling raw or cleaned listings into a uniform table
//! - Writing tables as UTF-8 (with BOM) delimited text
//! - Naming one file per category and cleanliness
//! - Computing table statistics for the end-of-run summary

mod csv_output;
pub mod stats;

pub use csv_output::{write_table, write_table_to, UTF8_BOM};
pub use stats::{print_table_stats, TableStats};

use crate::config::OutputConfig;
use crate::listing::{Category, CleanedListing, RawListing};
use std::path::PathBuf;

/// A header row plus data rows of identical width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds the raw table of a category
    pub fn raw(category: Category, listings: &[RawListing]) -> Self {
        Self {
            header: RawListing::columns(category),
            rows: listings.iter().map(RawListing::to_row).collect(),
        }
    }

    /// Builds the cleaned table of a category
    pub fn cleaned(category: Category, listings: &[CleanedListing]) -> Self {
        Self {
            header: CleanedListing::columns(category),
            rows: listings.iter().map(CleanedListing::to_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Path of the exported table for a category
///
/// Raw tables go to `<raw-dir>/<category>_raw.csv`, cleaned ones to
/// `<cleaned-dir>/<category>_cleaned.csv`.
pub fn table_path(config: &OutputConfig, category: Category, cleaned: bool) -> PathBuf {
    if cleaned {
        config
            .cleaned_dir
            .join(format!("{}_cleaned.csv", category.as_str()))
    } else {
        config.raw_dir.join(format!("{}_raw.csv", category.as_str()))
    }
}

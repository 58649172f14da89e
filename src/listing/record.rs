use crate::listing::category::{fields, Category};
use crate::ExtractError;

/// Column appended to cleaned tables for the parsed price
pub const PRICE_NUMERIC: &str = "price_numeric";

/// Column appended to cleaned tables for the parsed distance
pub const DISTANCE_NUMERIC: &str = "distance_numeric";

/// Text extracted from one listing card
///
/// Every field of the category is always present; an empty string means the
/// card did not contain the corresponding element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    category: Category,
    values: Vec<String>,
}

impl RawListing {
    /// Creates a listing with every field empty
    pub fn new(category: Category) -> Self {
        Self {
            category,
            values: vec![String::new(); category.field_specs().len()],
        }
    }

    /// Builder-style setter; unknown fields are ignored
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a field value, returning false if the category has no such field
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.category.position(field) {
            Some(index) => {
                self.values[index] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the value of a field, or None if the category has no such field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.category
            .position(field)
            .map(|index| self.values[index].as_str())
    }

    /// Values in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// (field, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.category
            .field_specs()
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.name, value.as_str()))
    }

    /// Column header of a raw table for the category
    pub fn columns(category: Category) -> Vec<String> {
        category.fields().into_iter().map(str::to_string).collect()
    }

    pub fn to_row(&self) -> Vec<String> {
        self.values.clone()
    }
}

/// A raw listing with normalized text and parsed numeric values
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedListing {
    /// Text fields after whitespace normalization; `year` holds the parsed
    /// integer or an empty string
    text: RawListing,

    pub year: Option<i32>,
    pub price_numeric: Option<f64>,
    pub distance_numeric: Option<f64>,
}

impl CleanedListing {
    pub(crate) fn new(
        text: RawListing,
        year: Option<i32>,
        price_numeric: Option<f64>,
        distance_numeric: Option<f64>,
    ) -> Self {
        Self {
            text,
            year,
            price_numeric,
            distance_numeric,
        }
    }

    pub fn category(&self) -> Category {
        self.text.category()
    }

    /// Returns the cleaned text of a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.text.get(field)
    }

    /// Views the cleaned listing as a raw one, e.g. to run the cleaning pass again
    pub fn as_raw(&self) -> &RawListing {
        &self.text
    }

    /// Column header of a cleaned table: raw columns, then the derived ones
    pub fn columns(category: Category) -> Vec<String> {
        let mut columns = RawListing::columns(category);
        columns.push(PRICE_NUMERIC.to_string());
        if category.has_field(fields::DISTANCE) {
            columns.push(DISTANCE_NUMERIC.to_string());
        }
        columns
    }

    /// Row in the order of [`CleanedListing::columns`]; nulls become empty cells
    pub fn to_row(&self) -> Vec<String> {
        let mut row = self.text.to_row();
        row.push(format_number(self.price_numeric));
        if self.category().has_field(fields::DISTANCE) {
            row.push(format_number(self.distance_numeric));
        }
        row
    }
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Outcome of scraping a single index page
///
/// A page that was fetched but held no listing cards is distinct from a page
/// that could not be fetched at all, although both end the page loop.
#[derive(Debug)]
pub enum PageResult {
    /// The page contained listing cards
    Listings {
        /// Successfully extracted listings, in page order
        records: Vec<RawListing>,
        /// Cards that were skipped
        failures: Vec<ExtractError>,
    },

    /// The page was fetched but had no listing cards
    Empty,

    /// The page could not be fetched
    FetchFailed,
}

impl PageResult {
    /// Number of listing cards found on the page
    pub fn card_count(&self) -> usize {
        match self {
            Self::Listings { records, failures } => records.len() + failures.len(),
            Self::Empty | Self::FetchFailed => 0,
        }
    }
}

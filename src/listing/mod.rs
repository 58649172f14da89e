//! Listing data model
//!
//! This module defines what a scraped listing looks like:
//! - `Category`: the three listing families and their field tables
//! - `RawListing`: extracted text, one value per category field
//! - `CleanedListing`: a raw listing plus the parsed numeric values
//! - `PageResult`: the outcome of scraping one index page

mod category;
mod record;

pub use category::{fields, Category, FieldRule, FieldSpec, Marker};
pub use record::{CleanedListing, PageResult, RawListing, DISTANCE_NUMERIC, PRICE_NUMERIC};

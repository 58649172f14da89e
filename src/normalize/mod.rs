//! Cleaning pass over raw listings
//!
//! Turns the raw text of each listing into typed values:
//! - price and distance text into numbers
//! - the year into an integer
//! - free-text fields into whitespace-normalized strings
//!
//! The pass is pure and order-preserving: it never drops a listing, and
//! running it again on its own output changes nothing.

use crate::listing::{fields, CleanedListing, RawListing};
use regex::Regex;
use std::sync::LazyLock;

/// ASCII digit groups, optionally separated by single whitespace characters
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\s?[0-9]+)*").unwrap());

/// Free-text fields rewritten by [`clean_text`]
pub const TEXT_FIELDS: [&str; 6] = [
    fields::TITLE,
    fields::BRAND,
    fields::TRANSMISSION,
    fields::FUEL_TYPE,
    fields::ADDRESS,
    fields::OWNER,
];

/// Collapses whitespace runs into single spaces and trims both ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts the first number from a free-text amount
///
/// Thousands separators (commas, or single spaces between digit groups) are
/// removed before parsing.
///
/// # Example
///
/// ```
/// use listing_harvest::normalize::extract_number;
///
/// assert_eq!(extract_number("3 000 000 FCFA"), Some(3_000_000.0));
/// assert_eq!(extract_number("Prix sur demande"), None);
/// ```
pub fn extract_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let without_commas = text.replace(',', "");
    let digits: String = NUMBER
        .find(&without_commas)?
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    digits.parse::<f64>().ok()
}

/// Parses a raw year that consists of ASCII digits only
pub fn clean_year(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Cleans a single listing
pub fn clean_listing(raw: &RawListing) -> CleanedListing {
    let mut text = raw.clone();

    for field in TEXT_FIELDS {
        if let Some(value) = raw.get(field) {
            text.set(field, clean_text(value));
        }
    }

    let year = raw.get(fields::YEAR).and_then(clean_year);
    text.set(
        fields::YEAR,
        year.map(|y| y.to_string()).unwrap_or_default(),
    );

    let price_numeric = raw.get(fields::PRICE).and_then(extract_number);
    let distance_numeric = raw.get(fields::DISTANCE).and_then(extract_number);

    CleanedListing::new(text, year, price_numeric, distance_numeric)
}

/// Cleans a collection of listings, preserving order
pub fn clean_listings(raws: &[RawListing]) -> Vec<CleanedListing> {
    raws.iter().map(clean_listing).collect()
}

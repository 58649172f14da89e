//! Listing extraction from fetched index pages
//!
//! Every listing card on a page is turned into one `RawListing` by walking
//! the category's field table. Each field is looked up independently; a
//! missing element leaves that field empty and never aborts the listing.

use crate::listing::{Category, FieldRule, Marker, RawListing};
use crate::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static LISTING_CARD: LazyLock<Selector> =
    LazyLock::new(|| selector("div.listings-cards__list-item"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2.listing-card__header__title"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| selector("h3.listing-card__header__price"));
static BYLINE: LazyLock<Selector> = LazyLock::new(|| selector("p.time-author"));
static ATTRIBUTE: LazyLock<Selector> = LazyLock::new(|| selector("li.listing-card__attribute"));
static TOWN: LazyLock<Selector> = LazyLock::new(|| selector("span.town-suburb"));
static PROVINCE: LazyLock<Selector> = LazyLock::new(|| selector("span.province"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

fn marker_selector(marker: Marker) -> &'static Selector {
    match marker {
        Marker::Heading => &HEADING,
        Marker::Price => &PRICE,
        Marker::Byline => &BYLINE,
    }
}

/// Returns all listing cards of a document, in page order
pub fn listing_cards(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&LISTING_CARD).collect()
}

/// Extracts every listing card of a page
///
/// The result holds exactly one entry per card, in page order. Cards that
/// cannot be turned into a listing are reported as errors in place.
pub fn extract_listings(
    document: &Html,
    category: Category,
) -> Vec<Result<RawListing, ExtractError>> {
    listing_cards(document)
        .into_iter()
        .map(|card| extract_listing(card, category))
        .collect()
}

/// Convenience function returning only the successfully extracted listings
pub fn extract_listings_simple(html: &str, category: Category) -> Vec<RawListing> {
    let document = Html::parse_document(html);
    extract_listings(&document, category)
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}

/// Extracts a single listing card according to the category field table
///
/// A card without any of the expected elements still yields a listing, with
/// every field empty.
///
/// # Errors
///
/// * `ExtractError::Field` - a derived field refers to a field that has not
///   been extracted before it
pub fn extract_listing(card: ElementRef<'_>, category: Category) -> Result<RawListing, ExtractError> {
    let mut listing = RawListing::new(category);
    let mut attributes: Option<Vec<String>> = None;

    for (index, spec) in category.field_specs().iter().enumerate() {
        let value = match spec.rule {
            FieldRule::Text(marker) => first_text(card, marker_selector(marker)).unwrap_or_default(),
            FieldRule::LinkedText(marker) => linked_text(card, marker_selector(marker)),
            FieldRule::FirstToken(source) => {
                let text = earlier_field(&listing, index, spec.name, source)?;
                text.split_whitespace().next().unwrap_or_default().to_string()
            }
            FieldRule::Year(source) => {
                let text = earlier_field(&listing, index, spec.name, source)?;
                find_year(text).unwrap_or_default().to_string()
            }
            FieldRule::Attribute(position) => attributes
                .get_or_insert_with(|| all_texts(card, &ATTRIBUTE))
                .get(position)
                .cloned()
                .unwrap_or_default(),
            FieldRule::Address => join_address(
                first_text(card, &TOWN).as_deref(),
                first_text(card, &PROVINCE).as_deref(),
            ),
        };
        listing.set(spec.name, value);
    }

    Ok(listing)
}

/// Looks up a field that must already have been extracted
fn earlier_field<'a>(
    listing: &'a RawListing,
    index: usize,
    field: &'static str,
    source: &'static str,
) -> Result<&'a str, ExtractError> {
    match listing.category().position(source) {
        Some(source_index) if source_index < index => Ok(listing.get(source).unwrap_or_default()),
        _ => Err(ExtractError::Field {
            field,
            message: format!("source field '{}' is not extracted before it", source),
        }),
    }
}

/// Returns the first 19xx/20xx year found in a text
pub fn find_year(text: &str) -> Option<&str> {
    YEAR.find(text).map(|m| m.as_str())
}

/// Joins town and province with a single space, skipping missing parts
pub fn join_address(town: Option<&str>, province: Option<&str>) -> String {
    [town, province]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

fn all_texts(card: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    card.select(selector).map(element_text).collect()
}

/// Text of the link inside the first matching element, or of the element itself
fn linked_text(card: ElementRef<'_>, selector: &Selector) -> String {
    match card.select(selector).next() {
        Some(element) => element
            .select(&LINK)
            .next()
            .map(element_text)
            .unwrap_or_else(|| element_text(element)),
        None => String::new(),
    }
}

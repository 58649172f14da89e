//! Page-count discovery and page URL construction
//!
//! The listing index shows a paginator with numbered links. The highest
//! `page=<n>` value found among those links is the number of pages.

use crate::crawler::fetcher::fetch_document;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static PAGINATOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav.paginator").unwrap());

static PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.page-link").unwrap());

static PAGE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"page=(\d+)").unwrap());

/// Builds the URL of a given index page
///
/// Page 1 is the bare base URL; later pages carry a `page` query parameter.
///
/// # Example
///
/// ```
/// use listing_harvest::crawler::page_url;
///
/// assert_eq!(page_url("https://example.com/cars", 1), "https://example.com/cars");
/// assert_eq!(page_url("https://example.com/cars", 3), "https://example.com/cars?page=3");
/// ```
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        return base_url.to_string();
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base_url, separator, page)
}

/// Extracts the page number carried by a paginator link
///
/// When the href embeds several `page=` parameters (for instance a nested
/// "return to search" query), the last one is the link's real target.
pub fn last_page_param(href: &str) -> Option<u32> {
    PAGE_PARAM
        .captures_iter(href)
        .last()
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Computes the number of pages advertised by a fetched index page
///
/// Returns 1 when the page has no paginator or none of its links carry a
/// usable page number.
pub fn max_page_in(document: &Html) -> u32 {
    let Some(paginator) = document.select(&PAGINATOR).next() else {
        tracing::debug!("No paginator found, assuming a single page");
        return 1;
    };

    paginator
        .select(&PAGE_LINK)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(last_page_param)
        .fold(1, u32::max)
}

/// Fetches the first index page and discovers the page count
///
/// A failed fetch is treated as a single-page listing.
pub async fn discover_page_count(client: &Client, base_url: &str) -> u32 {
    match fetch_document(client, base_url).await {
        Some(document) => max_page_in(&document),
        None => {
            tracing::warn!(
                "Could not fetch {} for page discovery, assuming a single page",
                base_url
            );
            1
        }
    }
}

//! Crawler module for paginated listing retrieval
//!
//! This module contains the scraping pipeline, including:
//! - HTTP fetching with a fixed timeout and user agent
//! - Page-count discovery from the index paginator
//! - Table-driven listing extraction
//! - The page loop with pacing, stop conditions and cancellation

mod coordinator;
mod extractor;
mod fetcher;
mod pagination;
mod progress;

pub use coordinator::{run_scrape, Coordinator, ScrapeReport};
pub use extractor::{
    extract_listing, extract_listings, extract_listings_simple, find_year, join_address,
    listing_cards,
};
pub use fetcher::{build_http_client, fetch_document, fetch_url, FetchResult};
pub use pagination::{discover_page_count, last_page_param, max_page_in, page_url};
pub use progress::{NoProgress, ProgressSink, TracingProgress};

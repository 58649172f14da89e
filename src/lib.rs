//! Listing-Harvest: a paginated classifieds scraper
//!
//! This crate collects vehicle listings from a classifieds site page by page,
//! extracts a fixed, category-specific set of fields from every listing card,
//! and optionally normalizes the raw text into numeric and categorical values.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod normalize;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Listing-Harvest operations
///
/// Fetch failures and missing markup never show up here: they degrade to
/// partial results inside the crawler.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output error: {0}")]
    Output(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while extracting a single listing card
///
/// These are caught per listing by the coordinator; the listing is skipped
/// and the rest of the page is still processed. Missing elements are not
/// errors: they leave the field empty.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("field '{field}' could not be derived: {message}")]
    Field {
        field: &'static str,
        message: String,
    },
}

/// Result type alias for Listing-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, ProgressSink, ScrapeReport};
pub use listing::{Category, CleanedListing, RawListing};
pub use normalize::clean_listings;
pub use state::{ScrapeState, StopReason};

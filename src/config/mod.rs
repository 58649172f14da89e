//! Configuration module for Listing-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to the fetch constants
//! the scraper was built around (10 s timeout, 1 s between pages).
//!
//! # Example
//!
//! ```no_run
//! use listing_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Delay between pages: {}ms", config.fetcher.page_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, OutputConfig, SourcesConfig, DEFAULT_MOTORCYCLES_URL,
    DEFAULT_RENTALS_URL, DEFAULT_USER_AGENT, DEFAULT_VEHICLES_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

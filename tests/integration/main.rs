//! Integration tests for Listing-Harvest
//!
//! These tests use wiremock to serve listing index pages and run the full
//! page loop end-to-end.

mod scrape_tests;

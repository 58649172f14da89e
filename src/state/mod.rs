//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `ScrapeState`: the page-loop state machine driven by the coordinator
//! - `StopReason`: why a scrape ended, carried by the terminal state

mod scrape_state;

pub use scrape_state::{ScrapeState, StopReason};

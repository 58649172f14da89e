//! Scrape coordinator - the paginated page loop
//!
//! This module drives one scrape of one category:
//! - Discovering the page count when the caller does not give one
//! - Fetching index pages strictly one after another
//! - Extracting listings and accumulating them
//! - Pacing requests and stopping on a failed fetch, an empty page or cancellation

use crate::config::FetcherConfig;
use crate::crawler::extractor::extract_listings;
use crate::crawler::fetcher::{build_http_client, fetch_document};
use crate::crawler::pagination::{discover_page_count, page_url};
use crate::crawler::progress::{ProgressSink, TracingProgress};
use crate::listing::{Category, CleanedListing, PageResult, RawListing};
use crate::normalize::clean_listings;
use crate::state::{ScrapeState, StopReason};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outcome of one scrape invocation
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// The scraped category
    pub category: Category,

    /// Listings gathered, in page order
    pub records: Vec<RawListing>,

    /// Number of pages the loop was asked to visit
    pub pages_requested: u32,

    /// Number of pages whose listings were collected
    pub pages_scraped: u32,

    /// Listing cards that could not be extracted
    pub skipped_listings: usize,

    /// Why the loop ended
    pub stop_reason: StopReason,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    /// Returns true if every requested page was processed
    pub fn is_complete(&self) -> bool {
        self.stop_reason.is_complete()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Runs the cleaning pass over the gathered listings
    pub fn cleaned(&self) -> Vec<CleanedListing> {
        clean_listings(&self.records)
    }
}

/// Accumulator for a single scrape, owned by the page loop
#[derive(Debug, Default)]
struct ScrapeSession {
    records: Vec<RawListing>,
    pages_scraped: u32,
    skipped_listings: usize,
}

/// Main scrape coordinator structure
pub struct Coordinator {
    client: Client,
    page_delay: Duration,
    progress: Box<dyn ProgressSink>,
}

impl Coordinator {
    /// Creates a coordinator that reports progress through `tracing`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &FetcherConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            page_delay: config.page_delay(),
            progress: Box::new(TracingProgress),
        })
    }

    /// Replaces the progress sink
    pub fn with_progress<P>(mut self, progress: P) -> Self
    where
        P: ProgressSink + 'static,
    {
        self.progress = Box::new(progress);
        self
    }

    fn report(&self, message: &str) {
        self.progress.on_progress(message);
    }

    /// Discovers the number of index pages behind a base URL
    pub async fn discover_pages(&self, base_url: &str) -> u32 {
        discover_page_count(&self.client, base_url).await
    }

    /// Fetches one index page and extracts its listings
    pub async fn scrape_page(&self, category: Category, url: &str) -> PageResult {
        let Some(document) = fetch_document(&self.client, url).await else {
            return PageResult::FetchFailed;
        };

        let results = extract_listings(&document, category);
        if results.is_empty() {
            return PageResult::Empty;
        }

        let mut records = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err(e) => failures.push(e),
            }
        }

        PageResult::Listings { records, failures }
    }

    /// Runs the page loop for one category
    ///
    /// `max_pages` of `None` runs page discovery first. The loop always
    /// returns the listings gathered so far, whatever the stop reason.
    /// `cancel` is checked before every fetch and interrupts the pacing delay.
    pub async fn run(
        &self,
        category: Category,
        base_url: &str,
        max_pages: Option<u32>,
        cancel: &CancellationToken,
    ) -> ScrapeReport {
        let started_at = Utc::now();

        let max_pages = match max_pages {
            Some(pages) => pages,
            None => {
                self.report("Detecting total page count...");
                let pages = self.discover_pages(base_url).await;
                self.report(&format!("{} pages detected", pages));
                pages
            }
        };

        tracing::info!(
            "Scraping {} from {} ({} pages)",
            category,
            base_url,
            max_pages
        );

        let mut session = ScrapeSession::default();
        let mut pending: Option<PageResult> = None;
        let mut state = ScrapeState::initial(max_pages);

        while !state.is_terminal() {
            tracing::trace!("{} state: {}", category, state);

            state = match state {
                ScrapeState::Fetch(page) => {
                    if cancel.is_cancelled() {
                        self.report(&format!("Scrape cancelled before page {}.", page));
                        ScrapeState::Stopped(StopReason::Cancelled { page })
                    } else {
                        self.report(&format!("Scraping page {}/{}...", page, max_pages));
                        let url = page_url(base_url, page);
                        match self.scrape_page(category, &url).await {
                            PageResult::FetchFailed => {
                                self.report(&format!("Could not fetch page {}, stopping.", page));
                                ScrapeState::Stopped(StopReason::FetchFailed { page })
                            }
                            result => {
                                pending = Some(result);
                                ScrapeState::Extract(page)
                            }
                        }
                    }
                }

                ScrapeState::Extract(page) => match pending.take() {
                    Some(PageResult::Listings { records, failures }) => {
                        for failure in &failures {
                            tracing::warn!("Skipping listing on page {}: {}", page, failure);
                            self.report(&format!("Listing skipped on page {}: {}", page, failure));
                        }
                        tracing::debug!(
                            "Page {}: {} listings, {} skipped",
                            page,
                            records.len(),
                            failures.len()
                        );
                        session.skipped_listings += failures.len();
                        session.records.extend(records);
                        session.pages_scraped += 1;
                        ScrapeState::Pace(page)
                    }
                    _ => {
                        self.report(&format!("No listings found on page {}, stopping.", page));
                        ScrapeState::Stopped(StopReason::EmptyPage { page })
                    }
                },

                ScrapeState::Pace(page) => {
                    if page >= max_pages {
                        ScrapeState::Done
                    } else {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => {
                                self.report(&format!("Scrape cancelled before page {}.", page + 1));
                                ScrapeState::Stopped(StopReason::Cancelled { page: page + 1 })
                            }
                            _ = tokio::time::sleep(self.page_delay) => ScrapeState::Fetch(page + 1),
                        }
                    }
                }

                terminal @ (ScrapeState::Done | ScrapeState::Stopped(_)) => terminal,
            };
        }

        let stop_reason = state.stop_reason().unwrap_or(StopReason::Completed);

        self.report(&format!(
            "Total {} scraped: {}",
            category,
            session.records.len()
        ));
        tracing::info!(
            "Scrape of {} finished: {} listings from {} pages ({})",
            category,
            session.records.len(),
            session.pages_scraped,
            stop_reason
        );

        ScrapeReport {
            category,
            records: session.records,
            pages_requested: max_pages,
            pages_scraped: session.pages_scraped,
            skipped_listings: session.skipped_listings,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Runs a complete scrape of one category with the given configuration
///
/// # Example
///
/// ```no_run
/// use listing_harvest::config::Config;
/// use listing_harvest::crawler::run_scrape;
/// use listing_harvest::Category;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let report = run_scrape(&config, Category::Vehicles, Some(2), &CancellationToken::new()).await?;
/// println!("{} listings", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(
    config: &crate::config::Config,
    category: Category,
    max_pages: Option<u32>,
    cancel: &CancellationToken,
) -> Result<ScrapeReport, HarvestError> {
    let coordinator = Coordinator::new(&config.fetcher)?;
    let base_url = config.sources.url_for(category);
    Ok(coordinator.run(category, base_url, max_pages, cancel).await)
}

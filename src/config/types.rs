use crate::listing::Category;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub const DEFAULT_VEHICLES_URL: &str = "https://dakar-auto.com/senegal/voitures-4";
pub const DEFAULT_MOTORCYCLES_URL: &str = "https://dakar-auto.com/senegal/motos-and-scooters-3";
pub const DEFAULT_RENTALS_URL: &str = "https://dakar-auto.com/senegal/location-de-voitures-19";

/// Main configuration structure for Listing-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP fetch behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Pause between two consecutive page fetches (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            page_delay_ms: 1000,
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Listing-index URL for each category
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub vehicles: String,
    pub motorcycles: String,
    pub rentals: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            vehicles: DEFAULT_VEHICLES_URL.to_string(),
            motorcycles: DEFAULT_MOTORCYCLES_URL.to_string(),
            rentals: DEFAULT_RENTALS_URL.to_string(),
        }
    }
}

impl SourcesConfig {
    /// Returns the base listing URL configured for a category
    pub fn url_for(&self, category: Category) -> &str {
        match category {
            Category::Vehicles => &self.vehicles,
            Category::Motorcycles => &self.motorcycles,
            Category::Rentals => &self.rentals,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving raw tables
    #[serde(rename = "raw-dir")]
    pub raw_dir: PathBuf,

    /// Directory receiving cleaned tables
    #[serde(rename = "cleaned-dir")]
    pub cleaned_dir: PathBuf,

    /// Field delimiter for the written tables
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data_raw"),
            cleaned_dir: PathBuf::from("data_cleaned"),
            delimiter: ',',
        }
    }
}

use crate::store::Store;
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for prodact
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Store identifier, matched case-insensitively
    pub store: String,

    /// Override for the store's base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Pause between page fetches (milliseconds, 0 disables it)
    #[serde(rename = "rate-limit-ms")]
    pub rate_limit_ms: u64,

    /// Search query; empty means every product
    pub query: String,

    /// Capacity of the product and error channels
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            store: Store::Oda.name().to_string(),
            base_url: None,
            rate_limit_ms: 1000,
            query: String::new(),
            channel_capacity: Store::Oda.page_size(),
            user_agent: format!("prodact/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScraperConfig {
    /// Resolves the configured store identifier
    pub fn store(&self) -> Result<Store, ConfigError> {
        Store::from_name(&self.store)
    }

    /// The base URL to scrape, falling back to the store's own site
    pub fn base_url(&self) -> Result<String, ConfigError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.store()?.default_base_url().to_string()),
        }
    }

    /// The rate limit as a duration
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the timestamped catalogue file is written to
    pub directory: String,

    /// Row format
    pub format: OutputFormat,

    /// Only write products that are currently available
    #[serde(rename = "only-available")]
    pub only_available: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "fixtures".to_string(),
            format: OutputFormat::Text,
            only_available: false,
        }
    }
}

/// How catalogue rows are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
        }
    }
}

//! prODAct: a product catalogue builder for online grocery stores
//!
//! This crate pages through a store's search API, streams every product it
//! finds over a bounded channel, and writes the catalogue out filtered by
//! availability.

pub mod config;
pub mod output;
pub mod scraper;
pub mod store;

use thiserror::Error;

/// Main error type for prodact operations
#[derive(Debug, Error)]
pub enum ProdactError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Producer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are fatal and always surface before the first page is requested.
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

    #[error("prodact doesn't support scraping {0} yet")]
    UnsupportedStore(String),
}

/// Per-page errors reported on the error channel while scraping
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("error while getting page #{page}: {source}")]
    Fetch {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("page #{page} answered with HTTP {status}")]
    Status { page: u32, status: u16 },

    #[error("cannot decode search results on page #{page}: {source}")]
    Decode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },
}

impl ScrapeError {
    /// The page number the error was raised for
    pub fn page(&self) -> u32 {
        match self {
            ScrapeError::Fetch { page, .. }
            | ScrapeError::Status { page, .. }
            | ScrapeError::Decode { page, .. } => *page,
        }
    }

    /// Whether this is a decode failure rather than a transport failure
    pub fn is_decode(&self) -> bool {
        matches!(self, ScrapeError::Decode { .. })
    }
}

/// Result type alias for prodact operations
pub type Result<T> = std::result::Result<T, ProdactError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use store::{Product, SearchResultPage, Store};

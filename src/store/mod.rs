//! Store backends
//!
//! A store identifier picks the search endpoint the scraper talks to.
//! Only Oda is supported today; parsing any other name fails before a
//! single request is made.

mod types;

pub use types::{Attributes, Availability, Product, SearchResultPage};

use crate::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Online stores prodact knows how to scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store {
    Oda,
}

impl Store {
    /// Resolves a store identifier, case-insensitively
    ///
    /// # Returns
    ///
    /// * `Ok(Store)` - The identifier names a supported store
    /// * `Err(ConfigError::UnsupportedStore)` - Anything else
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "oda" => Ok(Store::Oda),
            _ => Err(ConfigError::UnsupportedStore(name.to_string())),
        }
    }

    /// Canonical lowercase identifier
    pub fn name(&self) -> &'static str {
        match self {
            Store::Oda => "oda",
        }
    }

    /// Base URL of the store's public site
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Store::Oda => "https://oda.com",
        }
    }

    /// Number of products the search endpoint returns per page
    pub fn page_size(&self) -> usize {
        match self {
            Store::Oda => 40,
        }
    }
}

impl FromStr for Store {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Store::from_name(s)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

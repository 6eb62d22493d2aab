//! Search page fetcher
//!
//! One HTTP GET per page against the store's search endpoint. The body is
//! read to completion and decoded as a [`SearchResultPage`]. Nothing is
//! retried: a failed page is returned as an error exactly once and the
//! caller decides what to do next.

use crate::store::{SearchResultPage, Store};
use crate::{ConfigError, ScrapeError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Path of the search endpoint, relative to the store's base URL
const SEARCH_PATH: &str = "api/v1/search/";

/// Builds an HTTP client for talking to store APIs
///
/// # Arguments
///
/// * `user_agent` - The user agent sent with every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches and decodes single pages of search results from one store
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    store: Store,
    base_url: Url,
}

impl PageFetcher {
    /// Creates a fetcher for `store`, rooted at `base_url`
    ///
    /// # Returns
    ///
    /// * `Ok(PageFetcher)` - The base URL is usable
    /// * `Err(ConfigError::InvalidUrl)` - The base URL cannot be parsed
    pub fn new(client: Client, store: Store, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

        Ok(Self {
            client,
            store,
            base_url,
        })
    }

    /// Builds `{base}/api/v1/search/?page={page}&q={query}`
    ///
    /// The query is form-encoded; an empty query is kept as `q=`.
    pub fn page_url(&self, page: u32, query: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = match self.store {
            Store::Oda => format!("{}/{}", self.base_url.path().trim_end_matches('/'), SEARCH_PATH),
        };
        url.set_path(&path);
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string())
            .append_pair("q", query);
        url
    }

    /// Fetches one page of search results
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResultPage)` - The page was fetched and decoded
    /// * `Err(ScrapeError::Fetch)` - The request failed or the body could not be read
    /// * `Err(ScrapeError::Status)` - The server answered with a non-2xx status
    /// * `Err(ScrapeError::Decode)` - The body is not a valid search result page
    pub async fn fetch_page(&self, page: u32, query: &str) -> Result<SearchResultPage, ScrapeError> {
        let url = self.page_url(page, query);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Fetch { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ScrapeError::Fetch { page, source })?;

        serde_json::from_slice(&body).map_err(|source| ScrapeError::Decode { page, source })
    }
}

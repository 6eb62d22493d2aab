//! Catalogue producer
//!
//! Walks the search results page by page, starting at page 1, and publishes
//! every product on a bounded channel as soon as its page is decoded. The
//! first empty page ends the catalogue. Per-page failures are published on
//! a second channel and also end the scrape.
//!
//! The producer never buffers more than one page. Blocking sends on the
//! bounded product channel couple its pace to the consumer's.

use crate::scraper::fetcher::PageFetcher;
use crate::store::Product;
use crate::ScrapeError;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

/// Why the producer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with no products
    EmptyPage,

    /// A page could not be fetched or decoded; it was reported and treated as empty
    PageError,

    /// The cancellation token fired
    Cancelled,

    /// The product receiver was dropped
    ConsumerGone,
}

/// What the producer did during one scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    /// Pages requested, including the terminating one
    pub pages_fetched: u32,

    /// Products handed to the product channel
    pub products_sent: u64,

    /// Errors handed to the error channel
    pub errors_reported: u32,

    /// `total_hits` from the first decoded page
    pub total_hits: Option<u64>,

    pub stop_reason: StopReason,

    pub elapsed: Duration,
}

impl ProducerReport {
    fn new() -> Self {
        Self {
            pages_fetched: 0,
            products_sent: 0,
            errors_reported: 0,
            total_hits: None,
            stop_reason: StopReason::EmptyPage,
            elapsed: Duration::ZERO,
        }
    }

    /// Whether the emitted product count disagrees with the API's `total_hits`
    ///
    /// Only meaningful for a scrape that ran to its empty page; a zero
    /// `total_hits` is treated as "not reported".
    pub fn total_hits_mismatch(&self) -> bool {
        match self.total_hits {
            Some(hits) if hits > 0 => {
                self.stop_reason == StopReason::EmptyPage && hits != self.products_sent
            }
            _ => false,
        }
    }
}

/// Drives a [`PageFetcher`] across pages 1, 2, 3, … for one query
pub struct CatalogueProducer {
    fetcher: PageFetcher,
    rate_limit: Duration,
    query: String,
    cancel: CancellationToken,
    span: Span,
}

impl CatalogueProducer {
    /// Creates a producer
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetcher for the target store
    /// * `rate_limit` - Pause between successive pages; zero disables it
    /// * `query` - Search query, empty for every product
    pub fn new(fetcher: PageFetcher, rate_limit: Duration, query: impl Into<String>) -> Self {
        Self {
            fetcher,
            rate_limit,
            query: query.into(),
            cancel: CancellationToken::new(),
            span: Span::none(),
        }
    }

    /// Stops the scrape before the next page once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs the scrape inside `span`, so its events carry the caller's context
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Spawns the scrape on its own task
    pub fn spawn(
        self,
        products: Sender<Product>,
        errors: Sender<ScrapeError>,
    ) -> JoinHandle<ProducerReport> {
        tokio::spawn(self.run(products, errors))
    }

    /// Runs the scrape to completion
    ///
    /// The product channel is closed when this returns, because `products`
    /// is dropped. That is the only end-of-catalogue signal; the error
    /// channel is not a completion signal.
    pub async fn run(
        self,
        products: Sender<Product>,
        errors: Sender<ScrapeError>,
    ) -> ProducerReport {
        let span = self.span.clone();
        self.produce(products, errors).instrument(span).await
    }

    async fn produce(
        self,
        products: Sender<Product>,
        errors: Sender<ScrapeError>,
    ) -> ProducerReport {
        let start = Instant::now();
        let mut report = ProducerReport::new();
        let mut page: u32 = 1;

        tracing::info!(
            "starting to build product catalogue with a rate limit of {:?}...",
            self.rate_limit
        );

        report.stop_reason = 'pages: loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break 'pages StopReason::Cancelled,
                fetched = self.fetcher.fetch_page(page, &self.query) => fetched,
            };
            report.pages_fetched += 1;

            let results = match fetched {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!("{}; treating page #{} as the last one", e, page);
                    report.errors_reported += 1;
                    if errors.send(e).await.is_err() {
                        tracing::debug!("error receiver dropped");
                    }
                    break StopReason::PageError;
                }
            };

            if report.total_hits.is_none() {
                report.total_hits = Some(results.attributes.total_hits);
            }

            if results.is_empty() {
                tracing::info!("page #{} is empty, catalogue complete", page);
                break StopReason::EmptyPage;
            }

            tracing::info!("found {} products on page #{}...", results.products.len(), page);

            for product in results.products {
                if products.send(product).await.is_err() {
                    tracing::warn!("product receiver dropped, stopping at page #{}", page);
                    break 'pages StopReason::ConsumerGone;
                }
                report.products_sent += 1;
            }

            page += 1;

            if !self.rate_limit.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break 'pages StopReason::Cancelled,
                    _ = tokio::time::sleep(self.rate_limit) => {}
                }
            }
        };

        drop(products);
        report.elapsed = start.elapsed();

        if report.total_hits_mismatch() {
            tracing::warn!(
                "emitted {} products but the store reported {} hits",
                report.products_sent,
                report.total_hits.unwrap_or_default()
            );
        }

        tracing::info!(
            "finished producing catalogue: {} products from {} pages in {:?} ({:?})",
            report.products_sent,
            report.pages_fetched,
            report.elapsed,
            report.stop_reason
        );

        report
    }
}

//! Scraper module for building product catalogues
//!
//! This module contains the core scraping logic, including:
//! - Fetching and decoding single pages of search results
//! - Paging through a store's catalogue with a rate limit
//! - Wiring the producer and consumer together over bounded channels

mod fetcher;
mod producer;

pub use fetcher::{build_http_client, PageFetcher};
pub use producer::{CatalogueProducer, ProducerReport, StopReason};

use crate::config::Config;
use crate::output::{CatalogueConsumer, DisplayFilter, RowWriter, ScrapeSummary};
use crate::store::Product;
use crate::{ProdactError, ScrapeError};
use std::io::Write;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A scrape in progress: the receiving ends of both channels and the producer task
pub struct CatalogueStream {
    pub products: Receiver<Product>,
    pub errors: Receiver<ScrapeError>,
    pub producer: JoinHandle<ProducerReport>,
}

/// Starts scraping the configured store on a new task
///
/// The store identifier is resolved before anything is spawned, so an
/// unsupported store fails here without a single request being sent.
///
/// # Returns
///
/// * `Ok(CatalogueStream)` - The producer is running
/// * `Err(ProdactError)` - Unsupported store, bad base URL, or client setup failure
pub fn start_catalogue(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CatalogueStream, ProdactError> {
    let scraper = &config.scraper;
    let store = scraper.store()?;
    let client = build_http_client(&scraper.user_agent)?;
    let fetcher = PageFetcher::new(client, store, &scraper.base_url()?)?;

    let span = tracing::info_span!("scrape", store = %store, query = %scraper.query);
    let producer = CatalogueProducer::new(fetcher, scraper.rate_limit(), scraper.query.clone())
        .with_cancellation(cancel)
        .with_span(span);

    let (product_tx, products) = mpsc::channel(scraper.channel_capacity);
    let (error_tx, errors) = mpsc::channel(scraper.channel_capacity);

    Ok(CatalogueStream {
        products,
        errors,
        producer: producer.spawn(product_tx, error_tx),
    })
}

/// Runs a complete scrape and writes the catalogue to `sink`
///
/// This is the main entry point for building a catalogue. It will:
/// 1. Resolve the store and start the producer
/// 2. Filter and write products as they arrive
/// 3. Log every per-page error
/// 4. Wait for the producer and summarise the run
///
/// A write failure cancels the producer and is returned as an error.
///
/// # Example
///
/// ```no_run
/// use prodact::config::Config;
/// use prodact::scraper::build_catalogue;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (summary, _) = build_catalogue(&Config::default(), std::io::stdout(), CancellationToken::new()).await?;
/// println!("wrote {} products", summary.products_written);
/// # Ok(())
/// # }
/// ```
pub async fn build_catalogue<W: Write>(
    config: &Config,
    sink: W,
    cancel: CancellationToken,
) -> Result<(ScrapeSummary, W), ProdactError> {
    let stream = start_catalogue(config, cancel.clone())?;

    let consumer = CatalogueConsumer::new(
        RowWriter::new(sink, config.output.format),
        DisplayFilter::from_only_available(config.output.only_available),
    );

    let (tally, sink) = match consumer.run(stream.products, stream.errors).await {
        Ok(done) => done,
        Err(e) => {
            tracing::error!("{}; stopping the scrape", e);
            cancel.cancel();
            // The producer's report is of no use once output has failed
            let _ = stream.producer.await;
            return Err(e.into());
        }
    };

    let report = stream.producer.await?;
    Ok((ScrapeSummary::new(&report, tally), sink))
}

//! Catalogue consumer
//!
//! Waits on the product and error channels at the same time, writes the
//! products that pass the availability filter, and logs every scrape error
//! with its page number. The loop ends when the product channel closes.

use crate::output::format::RowWriter;
use crate::output::OutputError;
use crate::store::Product;
use crate::ScrapeError;
use std::io::Write;
use tokio::sync::mpsc::Receiver;

/// Which products make it into the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayFilter {
    #[default]
    All,
    AvailableOnly,
}

impl DisplayFilter {
    pub fn from_only_available(only_available: bool) -> Self {
        if only_available {
            DisplayFilter::AvailableOnly
        } else {
            DisplayFilter::All
        }
    }

    pub fn accepts(&self, product: &Product) -> bool {
        match self {
            DisplayFilter::All => true,
            DisplayFilter::AvailableOnly => product.is_available(),
        }
    }
}

/// Counts gathered while consuming one catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerTally {
    pub products_received: u64,
    pub products_written: u64,
    pub errors: Vec<String>,
}

/// Filters and writes products as they arrive
pub struct CatalogueConsumer<W: Write> {
    writer: RowWriter<W>,
    filter: DisplayFilter,
    tally: ConsumerTally,
}

impl<W: Write> CatalogueConsumer<W> {
    pub fn new(writer: RowWriter<W>, filter: DisplayFilter) -> Self {
        Self {
            writer,
            filter,
            tally: ConsumerTally::default(),
        }
    }

    /// Consumes both channels until the product channel closes
    ///
    /// Errors still buffered when the product channel closes are drained
    /// before returning. A write failure stops the loop immediately; the
    /// receivers are dropped with it, which the producer sees as a failed send.
    ///
    /// # Returns
    ///
    /// * `Ok((ConsumerTally, W))` - Every product was handled; the sink is flushed
    /// * `Err(OutputError)` - Writing a row failed
    pub async fn run(
        mut self,
        mut products: Receiver<Product>,
        mut errors: Receiver<ScrapeError>,
    ) -> Result<(ConsumerTally, W), OutputError> {
        loop {
            tokio::select! {
                received = products.recv() => match received {
                    Some(product) => self.handle_product(product)?,
                    None => break,
                },
                Some(err) = errors.recv() => self.handle_error(err),
            }
        }

        while let Ok(err) = errors.try_recv() {
            self.handle_error(err);
        }

        let sink = self.writer.finish()?;
        Ok((self.tally, sink))
    }

    fn handle_product(&mut self, product: Product) -> Result<(), OutputError> {
        self.tally.products_received += 1;
        if !self.filter.accepts(&product) {
            tracing::trace!("skipping unavailable product {}", product.id);
            return Ok(());
        }
        self.writer.write_product(&product)?;
        self.tally.products_written += 1;
        Ok(())
    }

    fn handle_error(&mut self, err: ScrapeError) {
        tracing::error!(page = err.page(), "{}", err);
        self.tally.errors.push(err.to_string());
    }
}

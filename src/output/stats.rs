//! End-of-run scrape statistics

use crate::output::consumer::ConsumerTally;
use crate::scraper::{ProducerReport, StopReason};
use std::time::Duration;

/// Scrape summary combining what the producer fetched and what was written
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    /// Pages requested, including the terminating one
    pub pages_fetched: u32,

    /// Products received from the producer
    pub products_received: u64,

    /// Products that passed the filter and were written
    pub products_written: u64,

    /// Hits reported by the store on the first page
    pub total_hits: Option<u64>,

    /// Messages of every error reported during the scrape
    pub errors: Vec<String>,

    pub stop_reason: StopReason,

    pub elapsed: Duration,
}

impl ScrapeSummary {
    pub fn new(report: &ProducerReport, tally: ConsumerTally) -> Self {
        Self {
            pages_fetched: report.pages_fetched,
            products_received: tally.products_received,
            products_written: tally.products_written,
            total_hits: report.total_hits,
            errors: tally.errors,
            stop_reason: report.stop_reason,
            elapsed: report.elapsed,
        }
    }

    /// Products dropped by the display filter
    pub fn products_filtered(&self) -> u64 {
        self.products_received - self.products_written
    }

    /// Whether the scrape reached the end of the catalogue without errors
    pub fn is_complete(&self) -> bool {
        self.stop_reason == StopReason::EmptyPage && self.errors.is_empty()
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &ScrapeSummary) {
    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Products received: {}", summary.products_received);
    println!("  Products written: {}", summary.products_written);
    println!("  Products filtered out: {}", summary.products_filtered());
    if let Some(hits) = summary.total_hits {
        println!("  Hits reported by store: {}", hits);
    }
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!("  Stopped: {:?}", summary.stop_reason);
    println!();

    if !summary.errors.is_empty() {
        println!("Errors ({}):", summary.errors.len());
        for error in &summary.errors {
            println!("  - {}", error);
        }
        println!();
    }
}

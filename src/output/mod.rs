//! Output module for writing the product catalogue
//!
//! This module handles:
//! - Consuming the product and error channels
//! - Filtering products by availability
//! - Formatting rows as text or CSV
//! - Naming timestamped catalogue files
//! - Printing end-of-run statistics

mod consumer;
mod format;
pub mod stats;

pub use consumer::{CatalogueConsumer, ConsumerTally, DisplayFilter};
pub use format::{format_row, RowWriter};
pub use stats::{print_summary, ScrapeSummary};

use crate::config::OutputFormat;
use chrono::{DateTime, DurationRound, TimeZone};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing the catalogue
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write results: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds `{directory}/products-{timestamp}.{ext}`
///
/// The timestamp is rounded to the minute, so runs started within the same
/// minute write to the same file.
pub fn catalogue_path<Tz>(directory: &Path, format: OutputFormat, now: DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let rounded = now
        .clone()
        .duration_round(chrono::Duration::minutes(1))
        .unwrap_or(now);
    directory.join(format!(
        "products-{}.{}",
        rounded.format("%Y-%m-%dT%H-%M"),
        format.extension()
    ))
}

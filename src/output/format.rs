//! Catalogue row formatting
//!
//! Text rows follow `{n}. {id}, {name}, {price}{currency}, {available}`;
//! CSV rows carry a header and quote fields that need it.

use crate::config::OutputFormat;
use crate::store::Product;
use std::io::{self, Write};

const CSV_HEADER: &str = "index,id,name,full_name,gross_price,currency,is_available,front_url";

/// Formats one product as a row, without the trailing newline
pub fn format_row(format: OutputFormat, index: usize, product: &Product) -> String {
    match format {
        OutputFormat::Text => format!(
            "{}. {}, {}, {}{}, {}",
            index,
            product.id,
            product.name,
            product.gross_price,
            product.currency,
            product.is_available()
        ),
        OutputFormat::Csv => [
            index.to_string(),
            product.id.to_string(),
            csv_field(&product.name),
            csv_field(&product.full_name),
            csv_field(&product.gross_price),
            csv_field(&product.currency),
            product.is_available().to_string(),
            csv_field(&product.front_url),
        ]
        .join(","),
    }
}

/// Quotes a CSV field when it contains a delimiter, quote, or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes numbered catalogue rows to any [`Write`] sink
pub struct RowWriter<W: Write> {
    inner: W,
    format: OutputFormat,
    rows: usize,
    header_written: bool,
}

impl<W: Write> RowWriter<W> {
    pub fn new(inner: W, format: OutputFormat) -> Self {
        Self {
            inner,
            format,
            rows: 0,
            header_written: false,
        }
    }

    /// Writes one product, numbering rows from 1
    pub fn write_product(&mut self, product: &Product) -> io::Result<()> {
        self.write_header()?;
        self.rows += 1;
        writeln!(self.inner, "{}", format_row(self.format, self.rows, product))
    }

    /// Number of product rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes the sink; an empty CSV catalogue still gets its header
    pub fn finish(mut self) -> io::Result<W> {
        self.write_header()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_header(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;
        if self.format == OutputFormat::Csv {
            writeln!(self.inner, "{}", CSV_HEADER)?;
        }
        Ok(())
    }
}

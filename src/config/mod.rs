//! Configuration module for prodact
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a config file is optional; command-line
//! flags are applied on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use prodact::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("prodact.toml")).unwrap();
//! println!("Rate limit: {}ms", config.scraper.rate_limit_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, OutputFormat, ScraperConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

//! Integration tests for prodact
//!
//! These tests use wiremock to stand in for a store's search API and run
//! whole scrapes end-to-end.

mod scrape_tests;

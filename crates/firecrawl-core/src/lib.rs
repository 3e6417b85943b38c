//! Firecrawl core — typed async client for the Firecrawl scraping and crawling API.

pub mod client;
pub mod error;
pub mod types;
pub mod validation;

pub use client::{
    ClientConfig, FirecrawlClient, DEFAULT_API_URL, DEFAULT_TIMEOUT, QUICK_EXTRACT_CONCURRENCY,
};
pub use error::{FirecrawlError, FirecrawlResult};
pub use types::*;
pub use validation::{normalize_schema, validate_query, validate_url, validate_urls};

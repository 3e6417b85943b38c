//! MCP tool implementations.

pub mod cancel_crawl;
pub mod check_batch_scrape_status;
pub mod check_crawl_status;
pub mod check_extract_status;
pub mod quick_web_extract;
pub mod registry;
pub mod scrape_url;
pub mod search;
pub mod start_batch_scrape;
pub mod start_crawl;
pub mod start_extract;
mod support;

pub use registry::ToolRegistry;

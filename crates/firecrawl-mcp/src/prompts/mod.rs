//! MCP prompt implementations.

pub mod crawl_site;
pub mod extract_data;
pub mod registry;
pub mod research;
pub mod scrape_page;

pub use registry::PromptRegistry;

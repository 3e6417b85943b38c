//! Firecrawl MCP Server — web scraping, search, and crawl jobs as MCP tools.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{build_client, ServerOptions};
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;

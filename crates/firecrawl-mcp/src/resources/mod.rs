//! MCP resource implementations.

pub mod config;
pub mod job;
pub mod registry;
pub mod templates;

pub use registry::ResourceRegistry;

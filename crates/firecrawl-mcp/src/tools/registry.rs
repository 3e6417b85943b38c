//! Tool registration and dispatch.

use std::sync::Arc;

use serde_json::Value;

use firecrawl_core::FirecrawlClient;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{
    cancel_crawl, check_batch_scrape_status, check_crawl_status, check_extract_status,
    quick_web_extract, scrape_url, search, start_batch_scrape, start_crawl, start_extract,
};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            scrape_url::definition(),
            search::definition(),
            start_crawl::definition(),
            check_crawl_status::definition(),
            cancel_crawl::definition(),
            start_batch_scrape::definition(),
            check_batch_scrape_status::definition(),
            start_extract::definition(),
            check_extract_status::definition(),
            quick_web_extract::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        client: &Arc<FirecrawlClient>,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));
        tracing::debug!("tools/call {name}");

        match name {
            "scrape_url" => scrape_url::execute(args, client).await,
            "search" => search::execute(args, client).await,
            "start_crawl" => start_crawl::execute(args, client).await,
            "check_crawl_status" => check_crawl_status::execute(args, client).await,
            "cancel_crawl" => cancel_crawl::execute(args, client).await,
            "start_batch_scrape" => start_batch_scrape::execute(args, client).await,
            "check_batch_scrape_status" => check_batch_scrape_status::execute(args, client).await,
            "start_extract" => start_extract::execute(args, client).await,
            "check_extract_status" => check_extract_status::execute(args, client).await,
            "quick_web_extract" => quick_web_extract::execute(args, client).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_unique() {
        let tools = ToolRegistry::list_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in ToolRegistry::list_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["required"].is_array(), "{}", tool.name);
        }
    }
}

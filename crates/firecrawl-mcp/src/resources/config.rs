//! Resource: firecrawl://config

use serde_json::json;

use firecrawl_core::FirecrawlClient;

use crate::tools::ToolRegistry;
use crate::types::{McpResult, ReadResourceResult, ResourceContent, SERVER_NAME, SERVER_VERSION};

use super::templates::CONFIG_URI;

pub fn read_config(client: &FirecrawlClient) -> McpResult<ReadResourceResult> {
    let tools: Vec<String> = ToolRegistry::list_tools()
        .into_iter()
        .map(|t| t.name)
        .collect();

    let value = json!({
        "server": SERVER_NAME,
        "version": SERVER_VERSION,
        "api_url": client.api_url(),
        "timeout_secs": client.timeout().as_secs(),
        "api_key_configured": true,
        "tools": tools,
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json(CONFIG_URI, &value)],
    })
}

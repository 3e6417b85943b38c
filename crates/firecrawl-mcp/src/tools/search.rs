//! Tool: search — Web search through Firecrawl.

use serde::Deserialize;
use serde_json::{json, Value};

use firecrawl_core::{FirecrawlClient, SearchOptions};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args};

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(flatten)]
    options: SearchOptions,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "search".to_string(),
        description: Some("Search the web and return matching pages".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "limit": { "type": "integer", "description": "Maximum number of results" },
                "lang": { "type": "string", "description": "Language code, e.g. en" },
                "country": { "type": "string", "description": "Country code, e.g. us" },
                "tbs": { "type": "string", "description": "Time filter, e.g. qdr:d for the past day" },
                "scrapeOptions": {
                    "type": "object",
                    "description": "Scrape each result with these options"
                }
            },
            "required": ["query"]
        }),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: SearchParams = parse_args(args)?;

    match client.search(&params.query, &params.options).await {
        Ok(results) => Ok(ToolCallResult::json(&results)),
        Err(e) => Ok(failure("search", &format!("'{}'", params.query), e)),
    }
}

//! Tool: start_crawl — Start an asynchronous crawl job.

use serde::Deserialize;
use serde_json::{json, Value};

use firecrawl_core::{CrawlOptions, FirecrawlClient};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args};

#[derive(Debug, Deserialize)]
struct StartCrawlParams {
    url: String,
    #[serde(flatten)]
    options: CrawlOptions,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "start_crawl".to_string(),
        description: Some(
            "Start crawling a site from a URL. Returns a job id immediately; poll check_crawl_status"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": { "type": "string", "description": "Starting URL" },
                "limit": { "type": "integer", "description": "Maximum pages to crawl" },
                "maxDepth": { "type": "integer", "description": "Maximum link depth" },
                "includePaths": { "type": "array", "items": { "type": "string" } },
                "excludePaths": { "type": "array", "items": { "type": "string" } },
                "allowBackwardLinks": { "type": "boolean" },
                "allowExternalLinks": { "type": "boolean" },
                "ignoreSitemap": { "type": "boolean" },
                "scrapeOptions": { "type": "object", "description": "Options applied to each page" }
            },
            "required": ["url"]
        }),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: StartCrawlParams = parse_args(args)?;

    match client.start_crawl(&params.url, &params.options).await {
        Ok(handle) => Ok(ToolCallResult::json(&json!({
            "job_id": handle.id,
            "kind": handle.id.kind_name(),
            "status_url": handle.status_url,
            "status": "started",
        }))),
        Err(e) => Ok(failure("start_crawl", &params.url, e)),
    }
}

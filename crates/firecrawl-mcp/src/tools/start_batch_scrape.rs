//! Tool: start_batch_scrape — Scrape many URLs in one asynchronous job.

use serde::Deserialize;
use serde_json::{json, Value};

use firecrawl_core::{FirecrawlClient, ScrapeOptions};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args, scrape_option_properties, with_properties};

#[derive(Debug, Deserialize)]
struct BatchParams {
    urls: Vec<String>,
    #[serde(flatten)]
    options: ScrapeOptions,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "start_batch_scrape".to_string(),
        description: Some(
            "Start scraping a list of URLs. Returns a job id; poll check_batch_scrape_status"
                .to_string(),
        ),
        input_schema: with_properties(
            json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1,
                        "description": "Absolute http(s) URLs to scrape"
                    }
                },
                "required": ["urls"]
            }),
            scrape_option_properties(),
        ),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: BatchParams = parse_args(args)?;
    let subject = format!("{} URLs", params.urls.len());

    match client.start_batch_scrape(&params.urls, &params.options).await {
        Ok(handle) => Ok(ToolCallResult::json(&json!({
            "job_id": handle.id,
            "kind": handle.id.kind_name(),
            "status_url": handle.status_url,
            "status": "started",
            "urls": params.urls.len(),
        }))),
        Err(e) => Ok(failure("start_batch_scrape", &subject, e)),
    }
}

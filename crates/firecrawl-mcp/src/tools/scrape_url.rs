//! Tool: scrape_url — Scrape a single page.

use serde::Deserialize;
use serde_json::{json, Value};

use firecrawl_core::{FirecrawlClient, ScrapeOptions};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args, scrape_option_properties, with_properties};

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    url: String,
    #[serde(flatten)]
    options: ScrapeOptions,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "scrape_url".to_string(),
        description: Some(
            "Scrape a single web page and return its content (markdown by default)".to_string(),
        ),
        input_schema: with_properties(
            json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "Absolute http(s) URL of the page" }
                },
                "required": ["url"]
            }),
            scrape_option_properties(),
        ),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: ScrapeParams = parse_args(args)?;

    match client.scrape_url(&params.url, &params.options).await {
        Ok(doc) => {
            tracing::debug!(
                "Scraped {} as {}",
                params.url,
                doc.source_url().unwrap_or("(no source URL)")
            );
            Ok(ToolCallResult::json(&doc))
        }
        Err(e) => Ok(failure("scrape_url", &params.url, e)),
    }
}

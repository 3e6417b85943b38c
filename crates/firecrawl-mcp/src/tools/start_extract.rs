//! Tool: start_extract — Start an asynchronous structured extraction.

use serde::Deserialize;
use serde_json::{json, Value};

use firecrawl_core::{ExtractOptions, FirecrawlClient};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args};

#[derive(Debug, Deserialize)]
struct StartExtractParams {
    urls: Vec<String>,
    #[serde(flatten)]
    options: ExtractOptions,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "start_extract".to_string(),
        description: Some(
            "Start extracting structured data from URLs. Returns a job id; poll check_extract_status"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": "URLs to extract from. Wildcards like https://a.com/* are passed through"
                },
                "prompt": { "type": "string", "description": "What to extract" },
                "schema": {
                    "type": "object",
                    "description": "JSON Schema, or shorthand like {\"title\": \"string\"}"
                },
                "systemPrompt": { "type": "string" },
                "allowExternalLinks": { "type": "boolean" },
                "enableWebSearch": { "type": "boolean" }
            },
            "required": ["urls"]
        }),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: StartExtractParams = parse_args(args)?;
    let subject = format!("{} URLs", params.urls.len());

    match client.start_extract(&params.urls, &params.options).await {
        Ok(handle) => Ok(ToolCallResult::json(&json!({
            "job_id": handle.id,
            "kind": handle.id.kind_name(),
            "status": "started",
        }))),
        Err(e) => Ok(failure("start_extract", &subject, e)),
    }
}

//! Tool: quick_web_extract — Extract structured data and wait for it.

use serde::Deserialize;
use serde_json::{json, Value};

use firecrawl_core::FirecrawlClient;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, parse_args};

#[derive(Debug, Deserialize)]
struct QuickExtractParams {
    urls: Vec<String>,
    #[serde(default)]
    schema: Option<Value>,
    #[serde(default)]
    prompt: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "quick_web_extract".to_string(),
        description: Some(
            "Extract structured data from a few URLs and return it directly, keyed by URL. \
             Requires a schema or a prompt"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1
                },
                "schema": {
                    "type": "object",
                    "description": "JSON Schema, or shorthand like {\"price\": \"number\"}"
                },
                "prompt": { "type": "string", "description": "What to extract" }
            },
            "required": ["urls"]
        }),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: QuickExtractParams = parse_args(args)?;
    let subject = format!("{} URLs", params.urls.len());

    match client
        .quick_web_extract(&params.urls, params.schema, params.prompt)
        .await
    {
        Ok(result) => {
            for url in &params.urls {
                if matches!(result.get(url.trim()), Some(Value::Null)) {
                    tracing::warn!("No data extracted from {}", url.trim());
                }
            }
            Ok(ToolCallResult::json(&result))
        }
        Err(e) => Ok(failure("quick_web_extract", &subject, e)),
    }
}

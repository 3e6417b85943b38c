//! Helpers shared by the tool implementations.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use firecrawl_core::{FirecrawlError, JobId, JobKind};

use crate::types::{McpError, McpResult, ToolCallResult};

/// Decode tool arguments. Malformed arguments are a protocol error, not a tool failure.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Turn an adapter error into a failed tool result.
pub(crate) fn failure(tool: &str, subject: &str, err: FirecrawlError) -> ToolCallResult {
    tracing::warn!("{tool} failed for {subject}: {err}");
    ToolCallResult::error(format!("{tool} failed for {subject}: {err}"))
}

pub(crate) fn job_id<K: JobKind>(raw: &str) -> Result<JobId<K>, FirecrawlError> {
    JobId::parse(raw.trim())
}

/// Schema for a tool that takes a single job id.
pub(crate) fn job_id_schema(kind: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "job_id": {
                "type": "string",
                "description": format!("Id returned when the {kind} job was started")
            }
        },
        "required": ["job_id"]
    })
}

/// Scrape option properties accepted by scrape_url and start_batch_scrape.
pub(crate) fn scrape_option_properties() -> Value {
    json!({
        "formats": {
            "type": "array",
            "items": {
                "type": "string",
                "enum": ["markdown", "html", "rawHtml", "links", "screenshot", "screenshot@fullPage"]
            },
            "description": "Output formats (default: markdown)"
        },
        "onlyMainContent": {
            "type": "boolean",
            "description": "Strip navigation, headers and footers"
        },
        "includeTags": { "type": "array", "items": { "type": "string" } },
        "excludeTags": { "type": "array", "items": { "type": "string" } },
        "waitFor": { "type": "integer", "description": "Milliseconds to wait before scraping" },
        "timeout": { "type": "integer", "description": "Remote timeout in milliseconds" }
    })
}

/// Merge extra properties into an object schema.
pub(crate) fn with_properties(mut schema: Value, extra: Value) -> Value {
    if let (Some(props), Value::Object(extra)) = (
        schema.get_mut("properties").and_then(Value::as_object_mut),
        extra,
    ) {
        props.extend(extra);
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_properties_merges() {
        let schema = with_properties(
            json!({ "type": "object", "properties": { "url": { "type": "string" } } }),
            scrape_option_properties(),
        );
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("url"));
        assert!(props.contains_key("onlyMainContent"));
    }

    #[test]
    fn test_failure_is_error_result() {
        let result = failure(
            "scrape_url",
            "https://a.com",
            FirecrawlError::Remote {
                status: 500,
                message: "boom".into(),
            },
        );
        assert!(result.is_error());
        assert_eq!(
            result.text_content(),
            "scrape_url failed for https://a.com: remote error (HTTP 500): boom"
        );
    }
}

//! Prompt: extract_data — Guide for structured extraction.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let urls = args
        .get("urls")
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams("'urls' argument is required".to_string()))?;

    let fields = args
        .get("fields")
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams("'fields' argument is required".to_string()))?;

    let text = format!(
        "Extract the following fields: {fields}\n\
         From these URLs: {urls}\n\n\
         Please:\n\
         1. Build a shorthand schema mapping each field to a type, e.g. {{\"title\": \"string\"}}\n\
         2. For up to three URLs, call quick_web_extract with that schema\n\
         3. For more URLs, call start_extract and poll check_extract_status\n\
         4. Report the extracted values per URL and flag missing fields"
    );

    Ok(PromptGetResult {
        description: Some("Guide for extracting structured data".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}

//! Prompt: scrape_page — Guide for reading a single page.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let url = args
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams("'url' argument is required".to_string()))?;

    let focus = args
        .get("focus")
        .and_then(Value::as_str)
        .map(|f| format!("\nFocus on: {f}\n"))
        .unwrap_or_default();

    let text = format!(
        "Read the page at {url}.\n{focus}\n\
         Please:\n\
         1. Use scrape_url with formats [\"markdown\"] and onlyMainContent true\n\
         2. If the content looks truncated, retry with a waitFor of 2000\n\
         3. Summarize the page and quote the relevant sections"
    );

    Ok(PromptGetResult {
        description: Some("Guide for scraping and summarizing a page".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}

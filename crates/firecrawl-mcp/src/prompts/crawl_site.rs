//! Prompt: crawl_site — Guide for crawling a site and polling the job.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let url = args
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams("'url' argument is required".to_string()))?;

    let limit = args
        .get("limit")
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(10);

    let text = format!(
        "Crawl the site starting at {url}, visiting at most {limit} pages.\n\n\
         Please:\n\
         1. Call start_crawl with url {url} and limit {limit}\n\
         2. Poll check_crawl_status with the returned job_id until the status is \
         completed, failed or cancelled\n\
         3. Do not poll more than once every few seconds\n\
         4. When completed, summarize each page in the returned data\n\
         5. If the crawl is no longer needed, stop it with cancel_crawl"
    );

    Ok(PromptGetResult {
        description: Some("Guide for crawling a site".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}

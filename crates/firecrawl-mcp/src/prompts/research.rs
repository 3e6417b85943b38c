//! Prompt: research — Guide for searching and reading sources.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let topic = args
        .get("topic")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| McpError::InvalidParams("'topic' argument is required".to_string()))?;

    let text = format!(
        "Research the topic: {topic}\n\n\
         Please:\n\
         1. Use search with a focused query and limit 5\n\
         2. Pick the most relevant results and read them with scrape_url\n\
         3. Cross-check facts between sources\n\
         4. Answer with citations to the URLs you used"
    );

    Ok(PromptGetResult {
        description: Some("Guide for researching a topic on the web".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}

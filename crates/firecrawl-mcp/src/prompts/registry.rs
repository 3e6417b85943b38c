//! Prompt registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptArgument, PromptDefinition, PromptGetResult};

use super::{crawl_site, extract_data, research, scrape_page};

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn list_prompts() -> Vec<PromptDefinition> {
        vec![
            PromptDefinition {
                name: "scrape_page".to_string(),
                description: Some("Guide for scraping and summarizing a page".to_string()),
                arguments: Some(vec![
                    PromptArgument {
                        name: "url".to_string(),
                        description: Some("Page to read".to_string()),
                        required: true,
                    },
                    PromptArgument {
                        name: "focus".to_string(),
                        description: Some("What to look for on the page".to_string()),
                        required: false,
                    },
                ]),
            },
            PromptDefinition {
                name: "crawl_site".to_string(),
                description: Some("Guide for crawling a site".to_string()),
                arguments: Some(vec![
                    PromptArgument {
                        name: "url".to_string(),
                        description: Some("Starting URL".to_string()),
                        required: true,
                    },
                    PromptArgument {
                        name: "limit".to_string(),
                        description: Some("Maximum pages (default 10)".to_string()),
                        required: false,
                    },
                ]),
            },
            PromptDefinition {
                name: "extract_data".to_string(),
                description: Some("Guide for extracting structured data".to_string()),
                arguments: Some(vec![
                    PromptArgument {
                        name: "urls".to_string(),
                        description: Some("Comma-separated URLs".to_string()),
                        required: true,
                    },
                    PromptArgument {
                        name: "fields".to_string(),
                        description: Some("Fields to extract".to_string()),
                        required: true,
                    },
                ]),
            },
            PromptDefinition {
                name: "research".to_string(),
                description: Some("Guide for researching a topic on the web".to_string()),
                arguments: Some(vec![PromptArgument {
                    name: "topic".to_string(),
                    description: Some("Topic or question".to_string()),
                    required: true,
                }]),
            },
        ]
    }

    pub fn get(name: &str, arguments: Option<Value>) -> McpResult<PromptGetResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "scrape_page" => scrape_page::expand(args),
            "crawl_site" => crawl_site::expand(args),
            "extract_data" => extract_data::expand(args),
            "research" => research::expand(args),
            _ => Err(McpError::PromptNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_crawl_site_default_limit() {
        let result =
            PromptRegistry::get("crawl_site", Some(json!({"url": "https://a.com"}))).unwrap();
        let text = match &result.messages[0].content {
            crate::types::ToolContent::Text { text } => text.clone(),
            _ => panic!("expected text"),
        };
        assert!(text.contains("at most 10 pages"));
        assert!(text.contains("check_crawl_status"));
    }

    #[test]
    fn test_missing_argument() {
        let err = PromptRegistry::get("scrape_page", None).unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[test]
    fn test_unknown_prompt() {
        let err = PromptRegistry::get("nope", None).unwrap_err();
        assert!(matches!(err, McpError::PromptNotFound(_)));
    }
}

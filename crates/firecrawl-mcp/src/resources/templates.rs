//! Resource URI templates and static resource definitions.

use crate::types::{ResourceDefinition, ResourceTemplateDefinition};

pub const CONFIG_URI: &str = "firecrawl://config";
pub const CRAWL_PREFIX: &str = "firecrawl://crawl/";
pub const BATCH_SCRAPE_PREFIX: &str = "firecrawl://batch-scrape/";
pub const EXTRACT_PREFIX: &str = "firecrawl://extract/";

pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    vec![
        ResourceTemplateDefinition {
            uri_template: format!("{CRAWL_PREFIX}{{id}}"),
            name: "Crawl Job".to_string(),
            description: Some("Status and results of a crawl job".to_string()),
            mime_type: Some("application/json".to_string()),
        },
        ResourceTemplateDefinition {
            uri_template: format!("{BATCH_SCRAPE_PREFIX}{{id}}"),
            name: "Batch Scrape Job".to_string(),
            description: Some("Status and documents of a batch scrape job".to_string()),
            mime_type: Some("application/json".to_string()),
        },
        ResourceTemplateDefinition {
            uri_template: format!("{EXTRACT_PREFIX}{{id}}"),
            name: "Extract Job".to_string(),
            description: Some("Status and data of an extraction job".to_string()),
            mime_type: Some("application/json".to_string()),
        },
    ]
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: CONFIG_URI.to_string(),
        name: "Server Configuration".to_string(),
        description: Some("Firecrawl endpoint and client settings (no secrets)".to_string()),
        mime_type: Some("application/json".to_string()),
    }]
}

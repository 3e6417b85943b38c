//! Resource registration and dispatch.

use std::sync::Arc;

use firecrawl_core::FirecrawlClient;

use crate::types::{McpError, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition};

use super::templates::{BATCH_SCRAPE_PREFIX, CONFIG_URI, CRAWL_PREFIX, EXTRACT_PREFIX};
use super::{config, job, templates};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        templates::list_resources()
    }

    pub async fn read(uri: &str, client: &Arc<FirecrawlClient>) -> McpResult<ReadResourceResult> {
        if uri == CONFIG_URI {
            config::read_config(client)
        } else if let Some(id) = uri.strip_prefix(CRAWL_PREFIX) {
            job::read_crawl(uri, id, client).await
        } else if let Some(id) = uri.strip_prefix(BATCH_SCRAPE_PREFIX) {
            job::read_batch_scrape(uri, id, client).await
        } else if let Some(id) = uri.strip_prefix(EXTRACT_PREFIX) {
            job::read_extract(uri, id, client).await
        } else {
            Err(McpError::ResourceNotFound(uri.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firecrawl_core::ClientConfig;

    fn client() -> Arc<FirecrawlClient> {
        Arc::new(
            FirecrawlClient::new(ClientConfig::new("fc-test").with_api_url("http://127.0.0.1:9"))
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_config_resource_hides_key() {
        let result = ResourceRegistry::read(CONFIG_URI, &client()).await.unwrap();
        let text = result.contents[0].text.clone().unwrap();
        assert!(text.contains("http://127.0.0.1:9"));
        assert!(!text.contains("fc-test"));
    }

    #[tokio::test]
    async fn test_unknown_uri() {
        let err = ResourceRegistry::read("firecrawl://nope", &client())
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_job_id_rejected_before_request() {
        let err = ResourceRegistry::read("firecrawl://crawl/bad id!", &client())
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }
}

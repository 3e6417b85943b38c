//! Resources: firecrawl://{crawl,batch-scrape,extract}/{id}

use firecrawl_core::{
    BatchScrape, Crawl, Extract, FirecrawlClient, FirecrawlError, JobId, JobKind, JobStatus,
};

use crate::types::{McpError, McpResult, ReadResourceResult, ResourceContent};

pub async fn read_crawl(uri: &str, id: &str, client: &FirecrawlClient) -> McpResult<ReadResourceResult> {
    let id = parse_id::<Crawl>(id)?;
    respond(uri, client.check_crawl_status(&id).await)
}

pub async fn read_batch_scrape(
    uri: &str,
    id: &str,
    client: &FirecrawlClient,
) -> McpResult<ReadResourceResult> {
    let id = parse_id::<BatchScrape>(id)?;
    respond(uri, client.check_batch_scrape_status(&id).await)
}

pub async fn read_extract(uri: &str, id: &str, client: &FirecrawlClient) -> McpResult<ReadResourceResult> {
    let id = parse_id::<Extract>(id)?;
    respond(uri, client.check_extract_status(&id).await)
}

fn parse_id<K: JobKind>(raw: &str) -> McpResult<JobId<K>> {
    JobId::parse(raw.trim()).map_err(|e| McpError::InvalidParams(format!("Invalid {} job ID: {e}", K::NAME)))
}

fn respond(uri: &str, status: Result<JobStatus, FirecrawlError>) -> McpResult<ReadResourceResult> {
    match status {
        Ok(status) => Ok(ReadResourceResult {
            contents: vec![ResourceContent::json(uri, &status)],
        }),
        Err(FirecrawlError::NotFound { .. }) => Err(McpError::ResourceNotFound(uri.to_string())),
        Err(e) => Err(e.into()),
    }
}

//! Tool: check_batch_scrape_status — Poll a batch scrape job.

use serde::Deserialize;
use serde_json::Value;

use firecrawl_core::{BatchScrape, FirecrawlClient};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, job_id, job_id_schema, parse_args};

#[derive(Debug, Deserialize)]
struct StatusParams {
    job_id: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "check_batch_scrape_status".to_string(),
        description: Some(
            "Check a batch scrape job. Completed jobs return documents keyed by URL".to_string(),
        ),
        input_schema: job_id_schema("batch scrape"),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: StatusParams = parse_args(args)?;
    let subject = format!("job {}", params.job_id);

    let result = match job_id::<BatchScrape>(&params.job_id) {
        Ok(id) => client.check_batch_scrape_status(&id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(status) => Ok(ToolCallResult::json(&status)),
        Err(e) => Ok(failure("check_batch_scrape_status", &subject, e)),
    }
}

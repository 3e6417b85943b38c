//! Tool: cancel_crawl — Ask the remote service to stop a crawl.

use serde::Deserialize;
use serde_json::Value;

use firecrawl_core::{Crawl, FirecrawlClient};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, job_id, job_id_schema, parse_args};

#[derive(Debug, Deserialize)]
struct CancelParams {
    job_id: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "cancel_crawl".to_string(),
        description: Some(
            "Cancel a running crawl job. Fails if the job has already finished".to_string(),
        ),
        input_schema: job_id_schema("crawl"),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: CancelParams = parse_args(args)?;
    let subject = format!("job {}", params.job_id);

    let result = match job_id::<Crawl>(&params.job_id) {
        Ok(id) => client.cancel_crawl(&id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(ack) => Ok(ToolCallResult::json(&ack)),
        Err(e) => Ok(failure("cancel_crawl", &subject, e)),
    }
}

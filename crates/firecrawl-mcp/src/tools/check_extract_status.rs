//! Tool: check_extract_status — Poll an extraction job.

use serde::Deserialize;
use serde_json::Value;

use firecrawl_core::{Extract, FirecrawlClient};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::support::{failure, job_id, job_id_schema, parse_args};

#[derive(Debug, Deserialize)]
struct StatusParams {
    job_id: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "check_extract_status".to_string(),
        description: Some("Check an extraction job and return its data once completed".to_string()),
        input_schema: job_id_schema("extract"),
    }
}

pub async fn execute(args: Value, client: &FirecrawlClient) -> McpResult<ToolCallResult> {
    let params: StatusParams = parse_args(args)?;
    let subject = format!("job {}", params.job_id);

    let result = match job_id::<Extract>(&params.job_id) {
        Ok(id) => client.check_extract_status(&id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(status) => Ok(ToolCallResult::json(&status)),
        Err(e) => Ok(failure("check_extract_status", &subject, e)),
    }
}

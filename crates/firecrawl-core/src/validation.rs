//! Input checks performed before any request leaves the process.

use serde_json::{json, Map, Value};
use url::Url;

use crate::error::{FirecrawlError, FirecrawlResult};

const MAX_JOB_ID_LEN: usize = 128;

/// Accept only absolute `http`/`https` URLs with a host.
pub fn validate_url(raw: &str) -> FirecrawlResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FirecrawlError::Validation("URL must not be empty".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| FirecrawlError::Validation(format!("malformed URL '{trimmed}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FirecrawlError::Validation(format!(
            "unsupported URL scheme '{}' in '{trimmed}' (expected http or https)",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(FirecrawlError::Validation(format!(
            "URL '{trimmed}' has no host"
        )));
    }

    Ok(url)
}

/// Validate a non-empty list of URLs.
pub fn validate_urls(urls: &[String]) -> FirecrawlResult<()> {
    if urls.is_empty() {
        return Err(FirecrawlError::Validation(
            "at least one URL is required".to_string(),
        ));
    }
    for url in urls {
        validate_url(url)?;
    }
    Ok(())
}

pub fn validate_query(query: &str) -> FirecrawlResult<()> {
    if query.trim().is_empty() {
        return Err(FirecrawlError::Validation(
            "search query must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Job ids become a path segment, so separators and whitespace are refused.
pub(crate) fn validate_job_id(id: &str) -> FirecrawlResult<()> {
    if id.is_empty() {
        return Err(FirecrawlError::Validation("job id must not be empty".to_string()));
    }
    if id.len() > MAX_JOB_ID_LEN {
        return Err(FirecrawlError::Validation(format!(
            "job id exceeds {MAX_JOB_ID_LEN} characters"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(FirecrawlError::Validation(format!(
            "job id '{id}' contains invalid characters"
        )));
    }
    Ok(())
}

/// Expand shorthand schemas such as `{"title": "string"}` into JSON Schema.
///
/// Anything that already looks like a JSON Schema (has a `type`, `properties`
/// or `$schema` key) is passed through unchanged.
pub fn normalize_schema(schema: Value) -> FirecrawlResult<Value> {
    let Value::Object(fields) = schema else {
        return Err(FirecrawlError::Validation(
            "extraction schema must be a JSON object".to_string(),
        ));
    };

    if ["type", "properties", "$schema"]
        .iter()
        .any(|k| fields.contains_key(*k))
    {
        return Ok(Value::Object(fields));
    }

    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, spec) in fields {
        let property = match spec {
            Value::String(ty) => json!({ "type": ty }),
            nested @ Value::Object(_) => normalize_schema(nested)?,
            other => {
                return Err(FirecrawlError::Validation(format!(
                    "schema field '{name}' must be a type name or an object, got {other}"
                )))
            }
        };
        required.push(Value::String(name.clone()));
        properties.insert(name, property);
    }

    Ok(json!({
        "type": "object",
        "properties": properties,
        "required": required,
    }))
}

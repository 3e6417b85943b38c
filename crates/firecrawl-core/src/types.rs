//! Request and response records exchanged with the Firecrawl API.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{FirecrawlError, FirecrawlResult};
use crate::validation::validate_job_id;

// ─────────────────────── job kinds ───────────────────────

/// A kind of asynchronous job run by the remote service.
pub trait JobKind: fmt::Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static {
    /// Human-readable name used in logs and error messages.
    const NAME: &'static str;
    /// Path of the job collection under `/v1/`.
    const PATH: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crawl {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchScrape {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {}

impl JobKind for Crawl {
    const NAME: &'static str = "crawl";
    const PATH: &'static str = "crawl";
}

impl JobKind for BatchScrape {
    const NAME: &'static str = "batch scrape";
    const PATH: &'static str = "batch/scrape";
}

impl JobKind for Extract {
    const NAME: &'static str = "extract";
    const PATH: &'static str = "extract";
}

/// Opaque job identifier, tied to the kind of job that issued it.
///
/// A crawl id cannot be passed where a batch scrape id is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobId<K: JobKind> {
    id: String,
    _kind: PhantomData<K>,
}

impl<K: JobKind> JobId<K> {
    /// Accept an identifier received from a caller.
    pub fn parse(raw: impl Into<String>) -> FirecrawlResult<Self> {
        let id = raw.into();
        validate_job_id(&id)?;
        Ok(Self {
            id,
            _kind: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }
}

impl<K: JobKind> fmt::Display for JobId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl<K: JobKind> Serialize for JobId<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

/// Returned by every start operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "")]
pub struct JobHandle<K: JobKind> {
    pub id: JobId<K>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
}

// ─────────────────────── job lifecycle ───────────────────────

/// Lifecycle of a remote job: `pending → running → {completed | failed | cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    /// Map a status string reported by the remote service.
    pub fn from_remote(status: &str) -> Option<Self> {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => Some(JobState::Pending),
            "scraping" | "processing" | "active" | "running" => Some(JobState::Running),
            "completed" => Some(JobState::Completed),
            "failed" => Some(JobState::Failed),
            "cancelled" => Some(JobState::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }

    /// Position in the lifecycle. Terminal states share the highest rank.
    pub fn rank(self) -> u8 {
        match self {
            JobState::Pending => 0,
            JobState::Running => 1,
            JobState::Completed | JobState::Failed | JobState::Cancelled => 2,
        }
    }

    /// Whether `self` is a legal observation after `previous` was observed.
    pub fn can_follow(self, previous: JobState) -> bool {
        if previous.is_terminal() {
            return self == previous;
        }
        self.rank() >= previous.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result payload of a finished job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPayload {
    /// Crawl and batch scrape output, keyed by source URL.
    Documents(BTreeMap<String, Value>),
    /// Extract output.
    Extracted(Value),
}

impl JobPayload {
    /// Number of documents, or 1 for an extraction.
    pub fn len(&self) -> usize {
        match self {
            JobPayload::Documents(docs) => docs.len(),
            JobPayload::Extracted(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            JobPayload::Documents(docs) => docs.is_empty(),
            JobPayload::Extracted(v) => v.is_null(),
        }
    }
}

/// Snapshot of a remote job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatus {
    pub id: String,
    pub kind: &'static str,
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Cursor for the next page of results when the remote paginates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Present only when `state` is [`JobState::Completed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<JobPayload>,
}

/// Acknowledgement of a cancellation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub id: String,
    pub state: JobState,
}

// ─────────────────────── options ───────────────────────

/// Output formats the remote scraper can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeFormat {
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "rawHtml")]
    RawHtml,
    #[serde(rename = "links")]
    Links,
    #[serde(rename = "screenshot")]
    Screenshot,
    #[serde(rename = "screenshot@fullPage")]
    ScreenshotFullPage,
    #[serde(rename = "extract")]
    Extract,
}

/// LLM extraction settings attached to a scrape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<ScrapeFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_main_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,
    /// Milliseconds to wait for the page before scraping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<u64>,
    /// Remote-side timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Time-based filter, e.g. `qdr:d` for the past day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tbs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_options: Option<ScrapeOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_backward_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_external_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_sitemap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_options: Option<ScrapeOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_external_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_web_search: Option<bool>,
}

// ─────────────────────── results ───────────────────────

/// A scraped document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Formats this crate does not model explicitly.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScrapeResult {
    /// Source URL recorded in the document metadata.
    pub fn source_url(&self) -> Option<&str> {
        source_url_of(self.metadata.as_ref()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Synchronous extraction output: one extracted object per URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractResult(pub BTreeMap<String, Value>);

impl ExtractResult {
    pub fn get(&self, url: &str) -> Option<&Value> {
        self.0.get(url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ─────────────────────── wire helpers ───────────────────────

/// Body returned by every start endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct StartJobResponse {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body returned by every status endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
    #[serde(default)]
    pub credits_used: Option<u64>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl StatusResponse {
    pub(crate) fn into_status<K: JobKind>(
        self,
        id: &JobId<K>,
        documents: bool,
    ) -> FirecrawlResult<JobStatus> {
        let state = JobState::from_remote(&self.status).ok_or_else(|| {
            FirecrawlError::Decode(format!(
                "unexpected {} job status '{}'",
                K::NAME,
                self.status
            ))
        })?;

        let expires_at = self
            .expires_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));

        let payload = match (state, self.data) {
            (JobState::Completed, Some(data)) if documents => {
                Some(JobPayload::Documents(documents_by_url(data)))
            }
            (JobState::Completed, Some(data)) => Some(JobPayload::Extracted(data)),
            _ => None,
        };

        Ok(JobStatus {
            id: id.as_str().to_string(),
            kind: K::NAME,
            state,
            total: self.total,
            completed: self.completed,
            credits_used: self.credits_used,
            expires_at,
            next: self.next,
            error: self.error,
            payload,
        })
    }
}

fn source_url_of(metadata: &Value) -> Option<&str> {
    ["sourceURL", "sourceUrl", "url"]
        .iter()
        .find_map(|key| metadata.get(key).and_then(Value::as_str))
}

/// Key crawl or batch scrape documents by their source URL.
pub(crate) fn documents_by_url(data: Value) -> BTreeMap<String, Value> {
    let docs = match data {
        Value::Array(docs) => docs,
        other => vec![other],
    };

    let mut out = BTreeMap::new();
    for (index, doc) in docs.into_iter().enumerate() {
        let key = doc
            .get("metadata")
            .and_then(source_url_of)
            .or_else(|| doc.get("url").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{index}"));
        if out.contains_key(&key) {
            tracing::debug!("Duplicate document for {key}, keeping the first");
            continue;
        }
        out.insert(key, doc);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_status_mapping() {
        assert_eq!(JobState::from_remote("scraping"), Some(JobState::Running));
        assert_eq!(JobState::from_remote("processing"), Some(JobState::Running));
        assert_eq!(JobState::from_remote("Completed"), Some(JobState::Completed));
        assert_eq!(JobState::from_remote("queued"), Some(JobState::Pending));
        assert_eq!(JobState::from_remote("cancelled"), Some(JobState::Cancelled));
        assert_eq!(JobState::from_remote("exploded"), None);
        assert_eq!(JobState::from_remote("done"), None);
        assert_eq!(JobState::from_remote("canceled"), None);
    }

    #[test]
    fn test_state_never_regresses() {
        assert!(JobState::Running.can_follow(JobState::Pending));
        assert!(JobState::Running.can_follow(JobState::Running));
        assert!(JobState::Completed.can_follow(JobState::Running));
        assert!(!JobState::Pending.can_follow(JobState::Running));
        assert!(!JobState::Running.can_follow(JobState::Completed));
        assert!(!JobState::Failed.can_follow(JobState::Completed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
    }

    #[test]
    fn test_job_id_rejects_path_segments() {
        assert!(JobId::<Crawl>::parse("job_123").is_ok());
        assert!(JobId::<Crawl>::parse("").is_err());
        assert!(JobId::<Crawl>::parse("../scrape").is_err());
        assert!(JobId::<Extract>::parse("a b").is_err());
    }

    #[test]
    fn test_job_handle_serializes_id_as_string() {
        let handle = JobHandle {
            id: JobId::<BatchScrape>::parse("job_123").unwrap(),
            status_url: None,
        };
        assert_eq!(serde_json::to_value(&handle).unwrap(), json!({ "id": "job_123" }));
    }

    #[test]
    fn test_documents_keyed_by_source_url() {
        let docs = documents_by_url(json!([
            { "markdown": "a", "metadata": { "sourceURL": "https://a.com" } },
            { "markdown": "b", "metadata": { "url": "https://b.com" } },
            { "markdown": "c" }
        ]));
        assert_eq!(docs.len(), 3);
        assert_eq!(docs["https://a.com"]["markdown"], "a");
        assert_eq!(docs["https://b.com"]["markdown"], "b");
        assert!(docs.contains_key("#2"));
    }

    #[test]
    fn test_payload_only_when_completed() {
        let id = JobId::<Crawl>::parse("c1").unwrap();
        let running: StatusResponse = serde_json::from_value(json!({
            "status": "scraping",
            "total": 10,
            "completed": 3,
            "data": [{ "metadata": { "sourceURL": "https://a.com" } }]
        }))
        .unwrap();
        let status = running.into_status(&id, true).unwrap();
        assert_eq!(status.state, JobState::Running);
        assert!(status.payload.is_none());

        let done: StatusResponse = serde_json::from_value(json!({
            "status": "completed",
            "expiresAt": "2026-01-01T00:00:00Z",
            "data": [{ "metadata": { "sourceURL": "https://a.com" } }]
        }))
        .unwrap();
        let status = done.into_status(&id, true).unwrap();
        assert_eq!(status.state, JobState::Completed);
        assert_eq!(status.payload.map(|p| p.len()), Some(1));
        assert!(status.expires_at.is_some());
    }

    #[test]
    fn test_scrape_format_wire_names() {
        let opts = ScrapeOptions {
            formats: vec![ScrapeFormat::Markdown, ScrapeFormat::RawHtml, ScrapeFormat::ScreenshotFullPage],
            only_main_content: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({
                "formats": ["markdown", "rawHtml", "screenshot@fullPage"],
                "onlyMainContent": true
            })
        );
    }
}

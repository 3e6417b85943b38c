//! Async HTTP client for the Firecrawl v1 API.
//!
//! Every public method is one remote call (quick extraction issues one call
//! per URL). Nothing is retried or cached; job state lives on the remote side.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{FirecrawlError, FirecrawlResult};
use crate::types::{
    Ack, BatchScrape, Crawl, CrawlOptions, Extract, ExtractOptions, ExtractResult, ExtractSpec,
    JobHandle, JobId, JobKind, JobState, JobStatus, ScrapeFormat, ScrapeOptions, ScrapeResult,
    SearchHit, SearchOptions, SearchResults, StartJobResponse, StatusResponse,
};
use crate::validation::{normalize_schema, validate_query, validate_url, validate_urls};

/// Public Firecrawl endpoint.
pub const DEFAULT_API_URL: &str = "https://api.firecrawl.dev";

/// Total request timeout applied by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Scrape requests in flight at once during a quick extraction.
pub const QUICK_EXTRACT_CONCURRENCY: usize = 4;

const USER_AGENT: &str = concat!("firecrawl-core/", env!("CARGO_PKG_VERSION"));

/// Settings needed to reach the remote service.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Stateless proxy to the Firecrawl API. Cheap to clone.
#[derive(Clone)]
pub struct FirecrawlClient {
    http: reqwest::Client,
    base: Url,
    api_key: Arc<str>,
    timeout: Duration,
}

impl fmt::Debug for FirecrawlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirecrawlClient")
            .field("base", &self.base.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Job context used to classify 404/409 replies.
struct JobRef<'a> {
    kind: &'static str,
    id: &'a str,
}

impl FirecrawlClient {
    pub fn new(config: ClientConfig) -> FirecrawlResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(FirecrawlError::Config("API key must not be empty".to_string()));
        }

        let mut base = Url::parse(config.api_url.trim())
            .map_err(|e| FirecrawlError::Config(format!("invalid API URL '{}': {e}", config.api_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(FirecrawlError::Config(format!(
                "API URL must use http or https, got '{}'",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FirecrawlError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!("Firecrawl client targeting {base}");

        Ok(Self {
            http,
            base,
            api_key: Arc::from(config.api_key.trim()),
            timeout: config.timeout,
        })
    }

    /// Base URL of the remote service.
    pub fn api_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ─────────────────────── synchronous calls ───────────────────────

    /// Scrape one page and return its content.
    pub async fn scrape_url(&self, url: &str, options: &ScrapeOptions) -> FirecrawlResult<ScrapeResult> {
        let url = validate_url(url)?;

        #[derive(Serialize)]
        struct Body<'a> {
            url: &'a str,
            #[serde(flatten)]
            options: &'a ScrapeOptions,
        }

        let body = Body {
            url: url.as_str(),
            options,
        };
        let value = self.send(Method::POST, "v1/scrape", Some(&body), None).await?;
        decode_data(value)
    }

    /// Run a web search.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> FirecrawlResult<SearchResults> {
        validate_query(query)?;

        #[derive(Serialize)]
        struct Body<'a> {
            query: &'a str,
            #[serde(flatten)]
            options: &'a SearchOptions,
        }

        let body = Body {
            query: query.trim(),
            options,
        };
        let value = self.send(Method::POST, "v1/search", Some(&body), None).await?;
        let warning = value
            .get("warning")
            .and_then(Value::as_str)
            .map(str::to_string);
        let results: Vec<SearchHit> = decode_data(value)?;
        Ok(SearchResults { results, warning })
    }

    // ─────────────────────── crawl jobs ───────────────────────

    /// Start a crawl. Returns as soon as the remote service has accepted the job.
    pub async fn start_crawl(&self, url: &str, options: &CrawlOptions) -> FirecrawlResult<JobHandle<Crawl>> {
        let url = validate_url(url)?;

        #[derive(Serialize)]
        struct Body<'a> {
            url: &'a str,
            #[serde(flatten)]
            options: &'a CrawlOptions,
        }

        let body = Body {
            url: url.as_str(),
            options,
        };
        self.start_job("v1/crawl", &body).await
    }

    pub async fn check_crawl_status(&self, id: &JobId<Crawl>) -> FirecrawlResult<JobStatus> {
        self.job_status(id, true).await
    }

    /// Ask the remote service to cancel a crawl.
    ///
    /// The job is looked up first; a job that already completed, failed or was
    /// cancelled yields [`FirecrawlError::Conflict`] and no cancel is sent.
    pub async fn cancel_crawl(&self, id: &JobId<Crawl>) -> FirecrawlResult<Ack> {
        let current = self.check_crawl_status(id).await?;
        if current.state.is_terminal() {
            return Err(FirecrawlError::Conflict(format!(
                "crawl job {id} already {}",
                current.state
            )));
        }

        let job = JobRef {
            kind: Crawl::NAME,
            id: id.as_str(),
        };
        let path = job_path::<Crawl>(id);
        let value = self
            .send(Method::DELETE, &path, None::<&()>, Some(job))
            .await?;

        let status = value.get("status").and_then(Value::as_str).ok_or_else(|| {
            FirecrawlError::Decode(format!("cancel reply for crawl job {id} has no status"))
        })?;
        let state = JobState::from_remote(status).ok_or_else(|| {
            FirecrawlError::Decode(format!("unexpected crawl job status '{status}'"))
        })?;

        // The job may have finished between the lookup and the cancel.
        if state.is_terminal() && state != JobState::Cancelled {
            return Err(FirecrawlError::Conflict(format!(
                "crawl job {id} already {state}"
            )));
        }

        tracing::info!("Cancel requested for crawl {id}: {state}");
        Ok(Ack {
            id: id.as_str().to_string(),
            state,
        })
    }

    // ─────────────────────── batch scrape jobs ───────────────────────

    pub async fn start_batch_scrape(
        &self,
        urls: &[String],
        options: &ScrapeOptions,
    ) -> FirecrawlResult<JobHandle<BatchScrape>> {
        validate_urls(urls)?;

        #[derive(Serialize)]
        struct Body<'a> {
            urls: Vec<&'a str>,
            #[serde(flatten)]
            options: &'a ScrapeOptions,
        }

        let body = Body {
            urls: urls.iter().map(|u| u.trim()).collect(),
            options,
        };
        self.start_job("v1/batch/scrape", &body).await
    }

    pub async fn check_batch_scrape_status(&self, id: &JobId<BatchScrape>) -> FirecrawlResult<JobStatus> {
        self.job_status(id, true).await
    }

    // ─────────────────────── extract jobs ───────────────────────

    pub async fn start_extract(
        &self,
        urls: &[String],
        options: &ExtractOptions,
    ) -> FirecrawlResult<JobHandle<Extract>> {
        validate_urls(urls)?;

        let mut options = options.clone();
        options.schema = options.schema.map(normalize_schema).transpose()?;

        #[derive(Serialize)]
        struct Body<'a> {
            urls: Vec<&'a str>,
            #[serde(flatten)]
            options: &'a ExtractOptions,
        }

        let body = Body {
            urls: urls.iter().map(|u| u.trim()).collect(),
            options: &options,
        };
        self.start_job("v1/extract", &body).await
    }

    pub async fn check_extract_status(&self, id: &JobId<Extract>) -> FirecrawlResult<JobStatus> {
        self.job_status(id, false).await
    }

    /// Extract structured data from each URL and wait for the results.
    ///
    /// Each distinct URL (after trimming) is scraped with the `extract` format,
    /// at most [`QUICK_EXTRACT_CONCURRENCY`] at a time. The first failure fails
    /// the whole call.
    pub async fn quick_web_extract(
        &self,
        urls: &[String],
        schema: Option<Value>,
        prompt: Option<String>,
    ) -> FirecrawlResult<ExtractResult> {
        validate_urls(urls)?;
        if schema.is_none() && prompt.as_deref().map_or(true, |p| p.trim().is_empty()) {
            return Err(FirecrawlError::Validation(
                "either a schema or a prompt is required for extraction".to_string(),
            ));
        }

        let options = ScrapeOptions {
            formats: vec![ScrapeFormat::Extract],
            extract: Some(ExtractSpec {
                schema: schema.map(normalize_schema).transpose()?,
                prompt,
                system_prompt: None,
            }),
            ..Default::default()
        };

        let mut seen = BTreeSet::new();
        let unique: Vec<&str> = urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| seen.insert(*u))
            .collect();
        if unique.len() < urls.len() {
            tracing::debug!(
                "Dropped {} duplicate URLs from quick extract",
                urls.len() - unique.len()
            );
        }

        let options = &options;
        let extracted: BTreeMap<String, Value> = stream::iter(unique)
            .map(|url| async move {
                let doc = self.scrape_url(url, options).await?;
                let data = doc.extract.ok_or_else(|| {
                    FirecrawlError::Decode(format!("no extracted data returned for {url}"))
                })?;
                Ok::<_, FirecrawlError>((url.to_string(), data))
            })
            .buffer_unordered(QUICK_EXTRACT_CONCURRENCY)
            .try_collect()
            .await?;

        Ok(ExtractResult(extracted))
    }

    // ─────────────────────── plumbing ───────────────────────

    async fn start_job<K: JobKind, B: Serialize>(&self, path: &str, body: &B) -> FirecrawlResult<JobHandle<K>> {
        let value = self.send(Method::POST, path, Some(body), None).await?;
        let started: StartJobResponse = serde_json::from_value(value)?;
        let id = JobId::parse(started.id)
            .map_err(|e| FirecrawlError::Decode(format!("remote returned an unusable job id: {e}")))?;
        tracing::info!("Started {} job {id}", K::NAME);
        Ok(JobHandle {
            id,
            status_url: started.url,
        })
    }

    async fn job_status<K: JobKind>(&self, id: &JobId<K>, documents: bool) -> FirecrawlResult<JobStatus> {
        let job = JobRef {
            kind: K::NAME,
            id: id.as_str(),
        };
        let value = self
            .send(Method::GET, &job_path::<K>(id), None::<&()>, Some(job))
            .await?;
        let response: StatusResponse = serde_json::from_value(value)?;
        response.into_status(id, documents)
    }

    fn endpoint(&self, path: &str) -> FirecrawlResult<Url> {
        self.base
            .join(path)
            .map_err(|e| FirecrawlError::Validation(format!("cannot build request URL for '{path}': {e}")))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        job: Option<JobRef<'_>>,
    ) -> FirecrawlResult<Value> {
        let url = self.endpoint(path)?;
        tracing::debug!("{method} {url}");

        let mut request: RequestBuilder = self
            .http
            .request(method.clone(), url)
            .bearer_auth(&*self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!("{method} {path} failed with HTTP {}: {message}", status.as_u16());
            return Err(classify(status, message, job));
        }

        let value: Value = if text.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&text)?
        };

        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = error_message(status, &text);
            tracing::warn!("{method} {path} reported failure: {message}");
            return Err(FirecrawlError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        Ok(value)
    }
}

fn job_path<K: JobKind>(id: &JobId<K>) -> String {
    format!("v1/{}/{}", K::PATH, id.as_str())
}

fn decode_data<T: DeserializeOwned>(mut value: Value) -> FirecrawlResult<T> {
    let data = value
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| FirecrawlError::Decode("response has no 'data' field".to_string()))?;
    Ok(serde_json::from_value(data)?)
}

/// Pull a readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error", "message", "details"]
            .iter()
            .find_map(|key| match v.get(key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
    });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

fn classify(status: StatusCode, message: String, job: Option<JobRef<'_>>) -> FirecrawlError {
    match (status, job) {
        (StatusCode::NOT_FOUND, Some(job)) => FirecrawlError::NotFound {
            kind: job.kind,
            id: job.id.to_string(),
        },
        (StatusCode::CONFLICT, Some(job)) => {
            FirecrawlError::Conflict(format!("{} job {}: {message}", job.kind, job.id))
        }
        _ => FirecrawlError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

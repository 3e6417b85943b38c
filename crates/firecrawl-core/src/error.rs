//! Error taxonomy for calls against the remote service.

/// Errors returned by [`crate::FirecrawlClient`].
#[derive(thiserror::Error, Debug)]
pub enum FirecrawlError {
    /// Input rejected before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote service answered with a non-2xx status.
    #[error("remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// The remote service does not know the job identifier.
    #[error("{kind} job not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The requested job transition is not possible, e.g. cancelling a finished job.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl FirecrawlError {
    /// Stable short name for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            FirecrawlError::Validation(_) => "validation",
            FirecrawlError::Remote { .. } => "remote",
            FirecrawlError::NotFound { .. } => "not_found",
            FirecrawlError::Conflict(_) => "conflict",
            FirecrawlError::Http(_) => "http",
            FirecrawlError::Decode(_) => "decode",
            FirecrawlError::Config(_) => "config",
        }
    }

    /// HTTP status reported by the remote service, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FirecrawlError::Remote { status, .. } => Some(*status),
            FirecrawlError::NotFound { .. } => Some(404),
            FirecrawlError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FirecrawlError {
    fn from(e: serde_json::Error) -> Self {
        FirecrawlError::Decode(e.to_string())
    }
}

pub type FirecrawlResult<T> = Result<T, FirecrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(FirecrawlError::Validation("x".into()).kind(), "validation");
        assert_eq!(
            FirecrawlError::NotFound {
                kind: "crawl",
                id: "abc".into()
            }
            .kind(),
            "not_found"
        );
        assert_eq!(FirecrawlError::Conflict("done".into()).kind(), "conflict");
    }

    #[test]
    fn test_remote_display_carries_status() {
        let err = FirecrawlError::Remote {
            status: 402,
            message: "Payment required".into(),
        };
        assert_eq!(err.to_string(), "remote error (HTTP 402): Payment required");
        assert_eq!(err.status(), Some(402));
    }

    #[test]
    fn test_not_found_display() {
        let err = FirecrawlError::NotFound {
            kind: "batch scrape",
            id: "job_1".into(),
        };
        assert_eq!(err.to_string(), "batch scrape job not found: job_1");
    }
}

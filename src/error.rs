//! Error types for the ingestion pipeline.
//!
//! The taxonomy mirrors where things go wrong in practice: transient fetch
//! errors, malformed feeds or pages, and persistence failures. None of these
//! are fatal past startup; candidate-level errors are logged and the
//! candidate is skipped, source-level errors abort only that source's pass.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network failure or timeout on an outbound request.
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Non-success HTTP status from a source.
    #[error("unexpected status {status} fetching {url}")]
    Status { status: u16, url: String },

    /// The document at a feed URL was neither valid RSS nor Atom.
    #[error("feed parse failed for {url}: {reason}")]
    FeedParse { url: String, reason: String },

    /// An article page was missing required content.
    #[error("page parse failed for {url}: {reason}")]
    PageParse { url: String, reason: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let e = ScrapeError::Status {
            status: 503,
            url: "https://example.com/feed".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "unexpected status 503 fetching https://example.com/feed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: ScrapeError = io.into();
        assert!(matches!(e, ScrapeError::Io(_)));
    }
}

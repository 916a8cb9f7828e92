//! Article discovery and extraction from heterogeneous news sources.
//!
//! Every source is handled in two phases:
//!
//! 1. **Discovery**: find candidate article URLs, either from a feed document
//!    ([`feed`]) or by crawling the source's landing page for links that look
//!    like articles ([`page`]).
//! 2. **Extraction**: download each candidate and parse the full page into
//!    title, body text, authors, publish date, and image ([`extract`]).
//!
//! All outbound requests share one HTTP client with a browser-identifying
//! User-Agent (some sources block obvious bots) and a hard 10 second timeout,
//! so a hung request can never stall the pipeline. Failed candidates are
//! logged and skipped without failing the batch.

pub mod extract;
pub mod feed;
pub mod page;

use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Browser-identifying User-Agent to reduce block rate.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Hard timeout for every outbound request.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client for all fetches.
pub(crate) static HTTP: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Fetch a URL as text, treating non-success statuses as errors.
pub(crate) async fn fetch_text(url: &str) -> Result<String> {
    let response = HTTP.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ScrapeError::Status {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Fetch a URL as raw bytes (feed documents declare their own encoding).
pub(crate) async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let response = HTTP.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ScrapeError::Status {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

//! Bounded-length article summarization.
//!
//! The summarization model is an external collaborator consumed through one
//! narrow contract: `summarize(text, max_words) -> text`. Which backend sits
//! behind that contract is decided exactly once at startup:
//!
//! - [`Summarizer::Remote`] when a model endpoint is configured and answers a
//!   probe request — an OpenAI-style chat completions API, called with
//!   bounded retry and exponential backoff.
//! - [`Summarizer::Extractive`] otherwise — leading sentences of the text,
//!   truncated to the word budget.
//!
//! `summarize` never fails for well-formed non-empty input: any remote error
//! degrades to the extractive method, and the word budget is enforced on
//! whatever comes back.

use rand::{rng, Rng};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};

/// Texts shorter than this are returned as-is; there is nothing to condense.
const MIN_SUMMARIZABLE_CHARS: usize = 100;

/// Sentences taken by the extractive method before word truncation.
const EXTRACTIVE_SENTENCES: usize = 5;

/// Backends that can produce a completion for a summarization prompt.
pub trait Complete {
    async fn complete(&self, text: &str, max_words: usize) -> Result<String>;
}

/// Chat-completions client for an OpenAI-style endpoint.
#[derive(Debug, Clone)]
pub struct RemoteModel {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl RemoteModel {
    pub fn new(endpoint: String, model: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint,
            model,
        }
    }
}

impl Complete for RemoteModel {
    async fn complete(&self, text: &str, max_words: usize) -> Result<String> {
        // Tokens run roughly 4/3 per word.
        let max_tokens = max_words * 4 / 3;
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "Summarize the following news article in at most {max_words} words. \
                         Reply with the summary only."
                    )
                },
                { "role": "user", "content": text }
            ],
            "max_tokens": max_tokens,
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status {
                status: response.status().as_u16(),
                url: self.endpoint.clone(),
            });
        }
        let payload: serde_json::Value = response.json().await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ScrapeError::PageParse {
                url: self.endpoint.clone(),
                reason: "completion response had no content".to_string(),
            })
    }
}

/// Decorator adding exponential backoff with jitter to any [`Complete`]
/// backend.
///
/// Delay between attempts: `min(base * 2^(attempt-1), max) + jitter(0..250ms)`.
#[derive(Debug, Clone)]
pub struct Retry<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T: Complete> Retry<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T: Complete> Complete for Retry<T> {
    async fn complete(&self, text: &str, max_words: usize) -> Result<String> {
        let mut attempt = 0usize;
        loop {
            match self.inner.complete(text, max_words).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(e);
                    }
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter);
                    warn!(attempt, max = self.max_retries, ?delay, error = %e,
                        "Summarizer attempt failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}

/// The summarization backend chosen at startup.
pub enum Summarizer {
    Remote(Retry<RemoteModel>),
    Extractive,
}

impl Summarizer {
    /// Select a backend once: Remote when `endpoint` is configured and a
    /// probe completion succeeds, Extractive otherwise. Never substituted
    /// again for the lifetime of the process.
    pub async fn select(endpoint: Option<String>, model: String) -> Self {
        let Some(endpoint) = endpoint else {
            info!("No summarizer endpoint configured; using extractive summaries");
            return Summarizer::Extractive;
        };
        let remote = RemoteModel::new(endpoint.clone(), model);
        match remote.complete("The probe article text.", 5).await {
            Ok(_) => {
                info!(%endpoint, "Summarizer endpoint answered probe; using remote model");
                Summarizer::Remote(Retry::new(remote, 3, Duration::from_secs(1)))
            }
            Err(e) => {
                warn!(%endpoint, error = %e,
                    "Summarizer endpoint failed probe; falling back to extractive summaries");
                Summarizer::Extractive
            }
        }
    }

    /// Summarize `text` to at most `max_words` words. Never fails: remote
    /// errors degrade to the extractive method.
    pub async fn summarize(&self, text: &str, max_words: usize) -> String {
        let text = text.trim();
        if text.chars().count() < MIN_SUMMARIZABLE_CHARS {
            return text.to_string();
        }
        match self {
            Summarizer::Extractive => extractive_summary(text, max_words),
            Summarizer::Remote(model) => match model.complete(text, max_words).await {
                Ok(summary) => truncate_words(&summary, max_words),
                Err(e) => {
                    warn!(error = %e, "Remote summarization failed; using extractive fallback");
                    extractive_summary(text, max_words)
                }
            },
        }
    }
}

/// Leading-sentences summary, truncated to the word budget.
///
/// Texts of three sentences or fewer are returned whole (word-truncated);
/// longer texts contribute their first [`EXTRACTIVE_SENTENCES`] sentences.
pub(crate) fn extractive_summary(text: &str, max_words: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= 3 {
        return truncate_words(text, max_words);
    }
    let summary = sentences[..EXTRACTIVE_SENTENCES.min(sentences.len())].join(" ");
    truncate_words(&summary, max_words)
}

/// Split on sentence-ending punctuation followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|n| n.is_whitespace()) {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

pub(crate) fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return words.join(" ");
    }
    words[..max_words].join(" ")
}

pub(crate) fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

//! Data models for news sources, candidate entries, and persisted articles.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Source`]: A configured news source with its fetch strategy
//! - [`RawEntry`]: A candidate article reference discovered during one pass
//! - [`Article`]: The canonical persisted record for a scraped article
//! - [`IndexRecord`]: One row of the append-only CSV index
//!
//! An [`Article`] is created once per successful extraction and never mutated
//! after it hits disk. Re-scraping the same URL produces a second file that
//! shares the identity prefix but carries a new timestamp suffix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a source's articles are discovered.
///
/// - `Feed`: the source URL points at an RSS or Atom document whose entries
///   link to full articles.
/// - `PageCrawl`: the source URL is a landing page; article links are found
///   by URL-pattern heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    Feed,
    PageCrawl,
}

/// A configured news source.
///
/// Sources are static: the registry in [`crate::sources`] defines them at
/// startup and they are never modified. Registry order determines scrape
/// order but carries no other meaning.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    /// Display name, also used (sanitized) as the output subdirectory.
    pub name: &'static str,
    /// Feed URL or landing page URL depending on `strategy`.
    pub url: &'static str,
    /// How to discover articles for this source.
    pub strategy: FetchStrategy,
    /// Topic always assigned to this source's articles.
    pub default_topic: &'static str,
}

/// An unprocessed reference to a candidate article.
///
/// Produced by feed parsing or landing-page link discovery; lives only for
/// the duration of one orchestrator pass. The `published_at` field holds the
/// cheap date from feed metadata when one is available, enabling a recency
/// check before the expensive full-page fetch.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub url: String,
    pub title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// The canonical persisted unit: one scraped, classified article.
///
/// `id` is a deterministic 128-bit hash of the canonical URL, so the same URL
/// always maps to the same identity regardless of scrape time. `categories`
/// is non-empty and always contains the source's default topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Deterministic hex-encoded hash of `url`.
    pub id: String,
    pub title: String,
    /// Main body text extracted from the page.
    pub content: String,
    pub url: String,
    /// Name of the source this article was scraped from.
    pub source: String,
    pub published_date: DateTime<Utc>,
    pub scraped_date: DateTime<Utc>,
    /// Raw HTML of the article page as downloaded.
    pub html: String,
    pub authors: Vec<String>,
    /// Most frequent non-stop-word terms from the body.
    pub keywords: Vec<String>,
    /// Short bounded-length synopsis of the body.
    pub summary: String,
    /// Assigned topics; order-irrelevant, duplicates collapsed.
    pub categories: Vec<String>,
    pub image_url: Option<String>,
}

impl Article {
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// One row of the append-only `articles_index.csv` ledger.
///
/// Field order matches the CSV header:
/// `id,title,source,url,published_date,scraped_date,categories,has_image,filename`.
/// Dates are RFC 3339 strings, topics are comma-joined, and `filename` is the
/// article's path relative to the output root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_date: String,
    pub scraped_date: String,
    pub categories: String,
    pub has_image: String,
    pub filename: String,
}

impl IndexRecord {
    /// Build the index row for an article persisted at `relative_path`.
    pub fn for_article(article: &Article, relative_path: &str) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            source: article.source.clone(),
            url: article.url.clone(),
            published_date: article.published_date.to_rfc3339(),
            scraped_date: article.scraped_date.to_rfc3339(),
            categories: article.categories.join(","),
            has_image: if article.has_image() { "yes" } else { "no" }.to_string(),
            filename: relative_path.to_string(),
        }
    }

    /// The individual topics recorded in this row.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.categories.split(',').filter(|t| !t.is_empty())
    }
}

//! The orchestrator: one full scrape pass across every registered source.
//!
//! For each source the pipeline discovers candidate entries (feed or landing
//! page, per the source's strategy), filters them for recency, extracts the
//! full page, classifies and summarizes the result, and persists it. Sources
//! are processed sequentially in registry order; one source failing never
//! stops the pass, and one bad entry never stops its source.
//!
//! Recency is checked twice: once against cheap feed metadata before the
//! expensive page fetch, and again after extraction with the page's own
//! publish date, which is authoritative when present. Entries with no date at
//! either stage pass through — a missing date is not evidence of staleness.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::classify;
use crate::models::{Article, FetchStrategy, RawEntry, Source};
use crate::recency;
use crate::scrapers::extract::{self, PageContent};
use crate::scrapers::{feed, page};
use crate::sources::list_sources;
use crate::storage::{article_identity, ArticleStore};
use crate::summarizer::Summarizer;

/// Default articles accepted per source per pass, counted after all filters.
pub const PER_SOURCE_CAP: usize = 10;

/// Word budget for article summaries.
pub const SUMMARY_MAX_WORDS: usize = 100;

/// Admission control for one source's batch: the per-source cap and the
/// within-batch duplicate-title check, evaluated at one fixed `now`.
///
/// The cap counts accepted articles only — entries dropped by recency,
/// extraction, or deduplication never consume capacity.
struct BatchPolicy {
    now: DateTime<Utc>,
    threshold_days: i64,
    cap: usize,
    accepted: usize,
    seen_titles: HashSet<String>,
}

impl BatchPolicy {
    fn new(now: DateTime<Utc>, threshold_days: i64, cap: usize) -> Self {
        Self {
            now,
            threshold_days,
            cap,
            accepted: 0,
            seen_titles: HashSet::new(),
        }
    }

    fn has_capacity(&self) -> bool {
        self.accepted < self.cap
    }

    fn is_recent(&self, published_at: Option<DateTime<Utc>>) -> bool {
        recency::is_recent(published_at, self.now, self.threshold_days)
    }

    /// Register a title; returns false when a same-titled article was already
    /// accepted in this batch. Comparison is case- and whitespace-insensitive.
    fn admit_title(&mut self, title: &str) -> bool {
        self.seen_titles.insert(normalize_title(title))
    }

    fn record_accept(&mut self) {
        self.accepted += 1;
    }
}

fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Runs scrape passes against an article store using a fixed summarizer.
pub struct Pipeline<'a> {
    store: &'a ArticleStore,
    summarizer: &'a Summarizer,
    recency_days: i64,
    per_source_cap: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        store: &'a ArticleStore,
        summarizer: &'a Summarizer,
        recency_days: i64,
        per_source_cap: usize,
    ) -> Self {
        Self {
            store,
            summarizer,
            recency_days,
            per_source_cap,
        }
    }

    /// One pass over every registered source. Returns the number of articles
    /// persisted.
    pub async fn run_all(&self) -> usize {
        let mut total = 0;
        for source in list_sources() {
            match self.process_source(source).await {
                Ok(count) => {
                    info!(source = source.name, accepted = count, "Source pass complete");
                    total += count;
                }
                Err(e) => {
                    warn!(source = source.name, error = %e, "Source failed; continuing with the rest");
                }
            }
        }
        total
    }

    /// Discover, filter, extract, and persist one source's batch.
    #[instrument(level = "info", skip_all, fields(source = source.name))]
    async fn process_source(&self, source: &Source) -> crate::error::Result<usize> {
        let entries = match source.strategy {
            FetchStrategy::Feed => feed::fetch_entries(source).await?,
            FetchStrategy::PageCrawl => page::discover_links(source).await?,
        };
        let attempted = entries.len();
        let mut policy = BatchPolicy::new(Utc::now(), self.recency_days, self.per_source_cap);

        for entry in entries {
            if !policy.has_capacity() {
                debug!(cap = self.per_source_cap, "Per-source cap reached");
                break;
            }
            if !policy.is_recent(entry.published_at) {
                debug!(url = %entry.url, "Entry predates the recency window; skipping");
                continue;
            }
            match self.process_entry(source, &entry, &mut policy).await {
                Ok(true) => policy.record_accept(),
                Ok(false) => {}
                Err(e) => warn!(url = %entry.url, error = %e, "Entry failed; continuing"),
            }
        }

        info!(attempted, accepted = policy.accepted, "Batch finished");
        Ok(policy.accepted)
    }

    /// Extract, re-filter, classify, summarize, and persist one entry.
    /// Returns whether the entry was accepted.
    async fn process_entry(
        &self,
        source: &Source,
        entry: &RawEntry,
        policy: &mut BatchPolicy,
    ) -> crate::error::Result<bool> {
        let Some(content) = extract::extract(&entry.url).await? else {
            debug!(url = %entry.url, "Page is not an article; skipping");
            return Ok(false);
        };

        // The page's own date is authoritative over feed metadata.
        let published_at = content.published_at.or(entry.published_at);
        if !policy.is_recent(published_at) {
            debug!(url = %entry.url, "Page publish date predates the recency window; skipping");
            return Ok(false);
        }
        if !policy.admit_title(&content.title) {
            debug!(url = %entry.url, title = %content.title, "Duplicate title within batch; skipping");
            return Ok(false);
        }

        let summary = self
            .summarizer
            .summarize(&content.body, SUMMARY_MAX_WORDS)
            .await;
        let article = assemble_article(source, &entry.url, content, published_at, summary, policy.now);
        self.store.persist(&article)?;
        Ok(true)
    }

    /// Fill in summaries for persisted articles that have none, in place.
    /// Returns the number of files updated.
    #[instrument(level = "info", skip_all)]
    pub async fn backfill_summaries(&self) -> crate::error::Result<usize> {
        let mut updated = 0;
        for path in self.store.article_paths()? {
            let mut article = match self.store.load_article(&path) {
                Ok(article) => article,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable article file");
                    continue;
                }
            };
            if !article.summary.trim().is_empty() {
                continue;
            }
            article.summary = self
                .summarizer
                .summarize(&article.content, SUMMARY_MAX_WORDS)
                .await;
            self.store.rewrite(&path, &article)?;
            debug!(path = %path.display(), "Backfilled summary");
            updated += 1;
        }
        info!(updated, "Summary backfill complete");
        Ok(updated)
    }
}

/// Turn extracted page content into the canonical persisted record.
///
/// An article with no recoverable publish date is stamped with the scrape
/// time, which the recency filter has already accepted.
fn assemble_article(
    source: &Source,
    url: &str,
    content: PageContent,
    published_at: Option<DateTime<Utc>>,
    summary: String,
    scraped_at: DateTime<Utc>,
) -> Article {
    let categories = classify::classify(&content.title, &content.body, source.default_topic);
    Article {
        id: article_identity(url),
        title: content.title,
        content: content.body,
        url: url.to_string(),
        source: source.name.to_string(),
        published_date: published_at.unwrap_or(scraped_at),
        scraped_date: scraped_at,
        html: content.html,
        authors: content.authors,
        keywords: content.keywords,
        summary,
        categories,
        image_url: content.image_url,
    }
}

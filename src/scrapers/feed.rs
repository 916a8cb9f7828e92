//! RSS and Atom feed discovery.
//!
//! Fetches a source's feed document and turns its entries into candidate
//! [`RawEntry`] values. The document is tried as RSS first and Atom second,
//! which covers every feed in the registry. Feed summaries are never used as
//! article bodies — they are teasers — so each entry's link still goes
//! through full-page extraction.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::error::{Result, ScrapeError};
use crate::models::{RawEntry, Source};
use crate::scrapers::extract::parse_date;

/// Entries examined per feed, to cap per-source fetch cost.
pub const FEED_ENTRY_LIMIT: usize = 10;

/// Fetch a source's feed and list its first [`FEED_ENTRY_LIMIT`] entries.
#[instrument(level = "info", skip_all, fields(source = source.name, url = source.url))]
pub async fn fetch_entries(source: &Source) -> Result<Vec<RawEntry>> {
    let bytes = super::fetch_bytes(source.url).await?;
    let entries = parse_feed(source.url, &bytes)?;
    debug!(count = entries.len(), "Feed entries discovered");
    Ok(entries)
}

/// Parse a feed document as RSS, then as Atom.
pub(crate) fn parse_feed(url: &str, bytes: &[u8]) -> Result<Vec<RawEntry>> {
    if let Ok(channel) = rss::Channel::read_from(bytes) {
        return Ok(rss_entries(&channel));
    }
    if let Ok(feed) = atom_syndication::Feed::read_from(bytes) {
        return Ok(atom_entries(&feed));
    }
    Err(ScrapeError::FeedParse {
        url: url.to_string(),
        reason: "document is neither valid RSS nor Atom".to_string(),
    })
}

fn rss_entries(channel: &rss::Channel) -> Vec<RawEntry> {
    channel
        .items()
        .iter()
        .take(FEED_ENTRY_LIMIT)
        .filter_map(|item| {
            let url = item.link()?.trim().to_string();
            if url.is_empty() {
                return None;
            }
            Some(RawEntry {
                url,
                title: item.title().map(|t| t.trim().to_string()),
                published_at: item.pub_date().and_then(parse_date),
            })
        })
        .collect()
}

fn atom_entries(feed: &atom_syndication::Feed) -> Vec<RawEntry> {
    feed.entries()
        .iter()
        .take(FEED_ENTRY_LIMIT)
        .filter_map(|entry| {
            let url = entry.links().first()?.href().trim().to_string();
            if url.is_empty() {
                return None;
            }
            let published_at: Option<DateTime<Utc>> = entry
                .published()
                .copied()
                .or_else(|| Some(*entry.updated()))
                .map(|ts| ts.with_timezone(&Utc));
            Some(RawEntry {
                url,
                title: Some(entry.title().to_string()),
                published_at,
            })
        })
        .collect()
}

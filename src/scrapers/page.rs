//! Landing-page link discovery for sources without a usable feed.
//!
//! Fetches the source's landing page and collects links whose URL shape looks
//! like an article: a year segment or a `news`/`article`/`story`/`content`
//! path component. Only links on the source's own host are kept, so the crawl
//! never wanders off to social networks or syndication partners.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, instrument};
use url::Url;

use crate::error::Result;
use crate::models::{RawEntry, Source};

/// Candidate links examined per landing page.
pub const CRAWL_CANDIDATE_LIMIT: usize = 10;

static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Path shapes that indicate an article rather than navigation.
static ARTICLE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(news|article|story|content)/|/20\d{2}/").unwrap());

/// Link prefixes and hosts that are never articles.
const SKIP_PATTERNS: &[&str] = &[
    "javascript:",
    "mailto:",
    "#",
    "twitter.com",
    "facebook.com",
];

/// Fetch a source's landing page and discover candidate article links.
#[instrument(level = "info", skip_all, fields(source = source.name, url = source.url))]
pub async fn discover_links(source: &Source) -> Result<Vec<RawEntry>> {
    let base = Url::parse(source.url)?;
    let html = super::fetch_text(source.url).await?;
    let links = candidate_links(&html, &base);
    debug!(count = links.len(), "Article links discovered");
    Ok(links
        .into_iter()
        .map(|url| RawEntry {
            url,
            title: None,
            published_at: None,
        })
        .collect())
}

/// Extract article-shaped, same-host links from landing page HTML.
///
/// Order of first appearance is preserved; duplicates are dropped and the
/// result is capped at [`CRAWL_CANDIDATE_LIMIT`].
pub(crate) fn candidate_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHORS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if SKIP_PATTERNS.iter().any(|p| href.contains(p)) {
            continue;
        }
        if !ARTICLE_PATH.is_match(href) {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if resolved.host_str() != base.host_str() {
            continue;
        }
        let url = resolved.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
        if links.len() >= CRAWL_CANDIDATE_LIMIT {
            break;
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/news").unwrap()
    }

    #[test]
    fn test_article_shaped_links_are_kept() {
        let html = r#"
            <a href="/news/world-12345">World story</a>
            <a href="/2025/05/06/local-story">Dated story</a>
            <a href="/about">About us</a>
            <a href="/contact">Contact</a>
        "#;
        let links = candidate_links(html, &base());
        assert_eq!(
            links,
            vec![
                "https://www.example.com/news/world-12345",
                "https://www.example.com/2025/05/06/local-story",
            ]
        );
    }

    #[test]
    fn test_external_hosts_are_dropped() {
        let html = r#"
            <a href="https://other.example.org/news/elsewhere">External</a>
            <a href="https://www.example.com/news/local">Local</a>
        "#;
        let links = candidate_links(html, &base());
        assert_eq!(links, vec!["https://www.example.com/news/local"]);
    }

    #[test]
    fn test_social_and_script_links_are_dropped() {
        let html = r##"
            <a href="javascript:void(0)">Menu</a>
            <a href="mailto:tips@example.com">Tips</a>
            <a href="https://twitter.com/example/news/1">Tweet</a>
            <a href="#news/top">Jump</a>
        "##;
        assert!(candidate_links(html, &base()).is_empty());
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let html = r#"
            <a href="/news/one">One</a>
            <a href="/news/one">One again</a>
        "#;
        let links = candidate_links(html, &base());
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_candidate_limit_applies() {
        let html: String = (0..25)
            .map(|i| format!("<a href=\"/news/story-{i}\">S{i}</a>"))
            .collect();
        let links = candidate_links(&html, &base());
        assert_eq!(links.len(), CRAWL_CANDIDATE_LIMIT);
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let html = r#"<a href="/story/deep-dive">Deep dive</a>"#;
        let links = candidate_links(html, &base());
        assert_eq!(links, vec!["https://www.example.com/story/deep-dive"]);
    }
}

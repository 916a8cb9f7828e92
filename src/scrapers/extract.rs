//! Full-page article extraction.
//!
//! Given an article URL this module downloads the raw HTML and parses out the
//! pieces the pipeline needs: title, body text, authors, publish date, and a
//! primary image. Metadata is recovered from several places in order of
//! reliability — JSON-LD blocks first, then OpenGraph/meta tags, then visible
//! markup — because no two outlets structure their pages the same way.
//!
//! Pages whose extracted body is shorter than [`MIN_BODY_CHARS`] are rejected
//! as navigation pages, video stubs, or paywalled fragments rather than real
//! articles.

use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::classify;
use crate::error::{Result, ScrapeError};

/// Minimum body length for a page to count as a real article.
pub const MIN_BODY_CHARS: usize = 500;

/// How many keywords to keep per article.
const KEYWORD_LIMIT: usize = 10;

static ARTICLE_P: Lazy<Selector> = Lazy::new(|| Selector::parse("article p").unwrap());
static ANY_P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static TITLE_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='og:title']").unwrap());
static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='og:image']").unwrap());
static TWITTER_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name='twitter:image']").unwrap());
static CONTENT_IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("article img[src]").unwrap());
static META_AUTHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name='author']").unwrap());
static META_PUBLISHED: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='article:published_time']").unwrap());
static TIME_DATETIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time[datetime]").unwrap());
static JSON_LD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

/// Everything recoverable from one article page.
///
/// This is the extractor's output; the orchestrator turns it into a
/// persisted [`crate::models::Article`] after classification.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub title: String,
    pub body: String,
    pub html: String,
    pub authors: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub keywords: Vec<String>,
}

/// Download and extract one article page.
///
/// Returns `Ok(None)` when the page is reachable but does not look like a
/// real article (body below the minimum length).
#[instrument(level = "debug", skip_all, fields(%url))]
pub async fn extract(url: &str) -> Result<Option<PageContent>> {
    let html = super::fetch_text(url).await?;
    parse_page(url, &html)
}

/// Parse already-downloaded HTML into a [`PageContent`].
pub fn parse_page(url: &str, html: &str) -> Result<Option<PageContent>> {
    let document = Html::parse_document(html);

    let body = extract_body(&document);
    if body.chars().count() < MIN_BODY_CHARS {
        debug!(%url, chars = body.chars().count(), "Body below minimum length; not an article");
        return Ok(None);
    }

    let title = extract_title(&document).ok_or_else(|| ScrapeError::PageParse {
        url: url.to_string(),
        reason: "no title found".to_string(),
    })?;

    let keywords = extract_keywords(&body);
    Ok(Some(PageContent {
        title,
        authors: extract_authors(&document),
        published_at: extract_published(&document),
        image_url: extract_image(&document),
        keywords,
        body,
        html: html.to_string(),
    }))
}

/// Main body text: paragraphs inside `<article>` when present, otherwise all
/// paragraphs on the page, joined with blank lines.
fn extract_body(document: &Html) -> String {
    let from_article = join_paragraphs(document.select(&ARTICLE_P));
    if from_article.chars().count() >= MIN_BODY_CHARS {
        return from_article;
    }
    join_paragraphs(document.select(&ANY_P))
}

fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = scraper::ElementRef<'a>>) -> String {
    paragraphs
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .join("\n\n")
}

/// Title from og:title, then the first `<h1>`, then `<title>`.
fn extract_title(document: &Html) -> Option<String> {
    if let Some(meta) = document.select(&OG_TITLE).next() {
        if let Some(content) = meta.value().attr("content") {
            let title = content.trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    for selector in [&*H1, &*TITLE_TAG] {
        if let Some(el) = document.select(selector).next() {
            let title = el.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }
    None
}

/// Authors from JSON-LD `author` fields, falling back to `meta[name=author]`.
fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    for script in document.select(&JSON_LD) {
        let raw = script.text().collect::<String>();
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw.trim()) {
            collect_jsonld_authors(&json, &mut authors);
        }
    }

    if authors.is_empty() {
        for meta in document.select(&META_AUTHOR) {
            if let Some(content) = meta.value().attr("content") {
                let name = content.trim();
                if !name.is_empty() {
                    authors.push(name.to_string());
                }
            }
        }
    }

    authors.into_iter().unique().collect()
}

fn collect_jsonld_authors(json: &serde_json::Value, authors: &mut Vec<String>) {
    if let Some(graph) = json.get("@graph").and_then(|g| g.as_array()) {
        for node in graph {
            collect_jsonld_authors(node, authors);
        }
    }
    let Some(author) = json.get("author") else {
        return;
    };
    match author {
        serde_json::Value::Array(entries) => {
            for entry in entries {
                if let Some(name) = entry.get("name").and_then(|n| n.as_str()) {
                    authors.push(name.trim().to_string());
                }
            }
        }
        serde_json::Value::Object(obj) => {
            if let Some(name) = obj.get("name").and_then(|n| n.as_str()) {
                authors.push(name.trim().to_string());
            }
        }
        serde_json::Value::String(name) => authors.push(name.trim().to_string()),
        _ => {}
    }
}

/// Publish date from JSON-LD `datePublished`, then the
/// `article:published_time` meta tag, then the first `<time datetime>`.
fn extract_published(document: &Html) -> Option<DateTime<Utc>> {
    for script in document.select(&JSON_LD) {
        let raw = script.text().collect::<String>();
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw.trim()) {
            if let Some(ts) = jsonld_date_published(&json).and_then(|s| parse_date(&s)) {
                return Some(ts);
            }
        }
    }
    if let Some(meta) = document.select(&META_PUBLISHED).next() {
        if let Some(ts) = meta.value().attr("content").and_then(parse_date) {
            return Some(ts);
        }
    }
    document
        .select(&TIME_DATETIME)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .and_then(parse_date)
}

fn jsonld_date_published(json: &serde_json::Value) -> Option<String> {
    if let Some(date) = json.get("datePublished").and_then(|d| d.as_str()) {
        return Some(date.to_string());
    }
    json.get("@graph")
        .and_then(|g| g.as_array())
        .and_then(|nodes| nodes.iter().find_map(jsonld_date_published))
}

/// Parse the date formats seen in the wild on article pages.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Primary image from og:image, then twitter:image, then the first image
/// inside the article body.
fn extract_image(document: &Html) -> Option<String> {
    for selector in [&*OG_IMAGE, &*TWITTER_IMAGE] {
        if let Some(meta) = document.select(selector).next() {
            if let Some(content) = meta.value().attr("content") {
                let src = content.trim();
                if !src.is_empty() {
                    return Some(src.to_string());
                }
            }
        }
    }
    document
        .select(&CONTENT_IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.to_string())
}

/// Most frequent non-stop-word terms in the body, longest-count first.
fn extract_keywords(body: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in classify::tokens(body) {
        if token.chars().count() >= 4 {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(KEYWORD_LIMIT)
        .map(|(token, _)| token)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_paragraphs(n: usize) -> String {
        "<p>The committee reviewed the findings in detail and published its \
         conclusions for the public record this week.</p>"
            .repeat(n)
    }

    fn article_html(extra_head: &str, body: &str) -> String {
        format!(
            "<html><head><title>Fallback Title</title>{extra_head}</head>\
             <body><article><h1>Visible Headline</h1>{body}</article></body></html>"
        )
    }

    #[test]
    fn test_short_body_is_rejected() {
        let html = article_html("", "<p>Too short to be an article.</p>");
        let result = parse_page("https://example.com/a", &html).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_long_body_is_accepted() {
        let html = article_html("", &long_paragraphs(8));
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert!(page.body.chars().count() >= MIN_BODY_CHARS);
        assert!(page.body.contains("committee"));
    }

    #[test]
    fn test_title_prefers_og_title() {
        let html = article_html(
            "<meta property='og:title' content='OG Headline'/>",
            &long_paragraphs(8),
        );
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert_eq!(page.title, "OG Headline");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = article_html("", &long_paragraphs(8));
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert_eq!(page.title, "Visible Headline");
    }

    #[test]
    fn test_authors_from_jsonld() {
        let head = r#"<script type="application/ld+json">
            {"@type":"NewsArticle","author":[{"name":"Jane Doe"},{"name":"John Roe"}]}
        </script>"#;
        let html = article_html(head, &long_paragraphs(8));
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert_eq!(page.authors, vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn test_authors_fall_back_to_meta_tag() {
        let html = article_html(
            "<meta name='author' content='Sam Smith'/>",
            &long_paragraphs(8),
        );
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert_eq!(page.authors, vec!["Sam Smith"]);
    }

    #[test]
    fn test_published_from_jsonld() {
        let head = r#"<script type="application/ld+json">
            {"@type":"NewsArticle","datePublished":"2025-05-06T10:30:00Z"}
        </script>"#;
        let html = article_html(head, &long_paragraphs(8));
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        let ts = page.published_at.unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-05-06T10:30:00+00:00");
    }

    #[test]
    fn test_published_from_meta_tag() {
        let html = article_html(
            "<meta property='article:published_time' content='2025-05-06T08:00:00+02:00'/>",
            &long_paragraphs(8),
        );
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert!(page.published_at.is_some());
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let html = article_html(
            "<meta property='article:published_time' content='last Tuesday'/>",
            &long_paragraphs(8),
        );
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert!(page.published_at.is_none());
    }

    #[test]
    fn test_image_from_og_image() {
        let html = article_html(
            "<meta property='og:image' content='https://cdn.example.com/lead.jpg'/>",
            &long_paragraphs(8),
        );
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert_eq!(
            page.image_url.as_deref(),
            Some("https://cdn.example.com/lead.jpg")
        );
    }

    #[test]
    fn test_keywords_are_frequent_terms() {
        let html = article_html("", &long_paragraphs(8));
        let page = parse_page("https://example.com/a", &html).unwrap().unwrap();
        assert!(page.keywords.len() <= 10);
        assert!(page.keywords.contains(&"committee".to_string()));
        // Stop words never surface as keywords.
        assert!(!page.keywords.contains(&"the".to_string()));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2025-05-06T10:30:00Z").is_some());
        assert!(parse_date("Tue, 06 May 2025 10:30:00 GMT").is_some());
        assert!(parse_date("2025-05-06").is_some());
        assert!(parse_date("not a date").is_none());
    }
}

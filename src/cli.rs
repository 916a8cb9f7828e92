//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment
//! variables.

use clap::Parser;

/// Command-line arguments for the news scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape into the default directory, keeping the last two days of news
/// newsense
///
/// # Custom output directory and a wider recency window
/// newsense -o ./archive --recency-days 7
///
/// # Summarize through a local OpenAI-compatible endpoint
/// newsense --summarizer-url http://localhost:8080/v1/chat/completions
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for scraped articles and the CSV index
    #[arg(short, long, default_value = "scraped_news")]
    pub output_dir: String,

    /// Only keep articles published within this many days
    #[arg(long, default_value_t = 2)]
    pub recency_days: i64,

    /// Most articles accepted per source per pass
    #[arg(long, default_value_t = 10)]
    pub per_source_cap: usize,

    /// Generate summaries for previously persisted articles that lack one
    #[arg(long)]
    pub backfill_summaries: bool,

    /// OpenAI-compatible chat completions endpoint for summarization
    /// (extractive summaries are used when unset or unreachable)
    #[arg(long, env = "SUMMARIZER_URL")]
    pub summarizer_url: Option<String>,

    /// Model name passed to the summarizer endpoint
    #[arg(long, env = "SUMMARIZER_MODEL", default_value = "gpt-4o-mini")]
    pub summarizer_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["newsense"]);
        assert_eq!(cli.output_dir, "scraped_news");
        assert_eq!(cli.recency_days, 2);
        assert_eq!(cli.per_source_cap, 10);
        assert!(!cli.backfill_summaries);
        assert!(cli.summarizer_url.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "newsense",
            "--output-dir",
            "./archive",
            "--recency-days",
            "7",
            "--summarizer-url",
            "http://localhost:8080/v1/chat/completions",
        ]);
        assert_eq!(cli.output_dir, "./archive");
        assert_eq!(cli.recency_days, 7);
        assert_eq!(
            cli.summarizer_url.as_deref(),
            Some("http://localhost:8080/v1/chat/completions")
        );
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["newsense", "-o", "/tmp/news"]);
        assert_eq!(cli.output_dir, "/tmp/news");
    }
}

//! # Newsense
//!
//! A news scraping and classification pipeline. Each run discovers candidate
//! articles from a static registry of sources (RSS/Atom feeds and crawlable
//! landing pages), keeps the recent ones, extracts the full pages, assigns
//! topic categories by keyword scoring, summarizes the bodies, and persists
//! everything as JSON files plus an append-only CSV index.
//!
//! ## Usage
//!
//! ```sh
//! newsense -o ./scraped_news --recency-days 2
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: List candidate entries per source (feed or page crawl)
//! 2. **Filtering**: Drop entries outside the recency window
//! 3. **Extraction**: Download each article page and parse out its content
//! 4. **Classification**: Score the text against per-topic keyword lists
//! 5. **Persistence**: Write JSON files and append to `articles_index.csv`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod classify;
mod cli;
mod error;
mod models;
mod pipeline;
mod recency;
mod scrapers;
mod sources;
mod storage;
mod summarizer;
mod utils;

use cli::Cli;
use pipeline::Pipeline;
use storage::ArticleStore;
use summarizer::Summarizer;
use utils::{ensure_writable_dir, truncate_for_log};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsense starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, args.recency_days, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    info!(
        sources = sources::list_sources().len(),
        recency_days = args.recency_days,
        "Source registry loaded"
    );

    // The summarizer backend is chosen once and used for the whole run.
    let summarizer = Summarizer::select(args.summarizer_url.clone(), args.summarizer_model.clone()).await;

    let store = ArticleStore::new(&args.output_dir)?;
    let pipeline = Pipeline::new(&store, &summarizer, args.recency_days, args.per_source_cap);
    let persisted = pipeline.run_all().await;
    info!(persisted, "Scrape pass complete");

    if args.backfill_summaries {
        let updated = pipeline.backfill_summaries().await?;
        info!(updated, "Backfilled summaries for earlier runs");
    }

    // ---- Post-run report ----
    let topics = store.topics()?;
    info!(topics = ?topics, "Topics on record");
    for topic in &topics {
        let records = store.records_by_topic(topic, 3)?;
        for record in records {
            info!(
                topic = %topic,
                source = %record.source,
                title = %truncate_for_log(&record.title, 80),
                "Recent headline"
            );
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

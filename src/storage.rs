//! Article persistence and the append-only CSV index.
//!
//! The filesystem is the database: each article is one JSON file under its
//! source's subdirectory, and `articles_index.csv` at the output root is an
//! append-only ledger with one row per persisted article. The ledger is the
//! only structure scanned for listing and topic filtering, so readers never
//! have to walk every article file.
//!
//! Layout:
//! ```text
//! output_root/
//! ├── articles_index.csv
//! ├── BBC_Technology/
//! │   ├── 3f2a…9c_20250506_143000.json
//! │   └── 3f2a…9c_20250507_091500.json   # same URL, later scrape
//! └── CNN/
//!     └── …
//! ```
//!
//! Identity is a deterministic 128-bit hash of the canonical URL, so repeated
//! scrapes of one URL share a filename prefix while the timestamp suffix keeps
//! every capture. Nothing here deletes a persisted article; the only in-place
//! rewrite is the backfill pass filling an empty synopsis.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::models::{Article, IndexRecord};

/// Name of the ledger file at the output root.
pub const INDEX_FILE: &str = "articles_index.csv";

const INDEX_HEADER: &[&str] = &[
    "id",
    "title",
    "source",
    "url",
    "published_date",
    "scraped_date",
    "categories",
    "has_image",
    "filename",
];

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Deterministic identity for an article URL: the first 16 bytes of its
/// SHA-256 digest, hex-encoded. Stable across calls and process restarts.
pub fn article_identity(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

/// Make a source name safe for use as a directory name: strip everything but
/// word characters, hyphens, and spaces, then replace spaces with underscores.
pub fn sanitize_source_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "").replace(' ', "_")
}

/// Owns the output root, the per-source article files, and the single writer
/// for the ledger.
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    /// Open (or create) a store rooted at `root`, writing the ledger header
    /// if the ledger does not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let store = Self { root };
        store.init_index()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn init_index(&self) -> Result<()> {
        if self.index_path().exists() {
            return Ok(());
        }
        let mut writer = csv::Writer::from_path(self.index_path())?;
        writer.write_record(INDEX_HEADER)?;
        writer.flush()?;
        Ok(())
    }

    /// Create the output subdirectory for a source if needed.
    pub fn ensure_source_dir(&self, source_name: &str) -> Result<PathBuf> {
        let dir = self.root.join(sanitize_source_name(source_name));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write an article under its source's subdirectory and append one row to
    /// the ledger. Returns the file path relative to the output root.
    ///
    /// Prior captures of the same URL are never overwritten: the filename
    /// carries a scrape-time suffix, and a collision within the same second
    /// gets a numeric disambiguator.
    #[instrument(level = "info", skip_all, fields(id = %article.id, source = %article.source))]
    pub fn persist(&self, article: &Article) -> Result<String> {
        let dir_name = sanitize_source_name(&article.source);
        let dir = self.root.join(&dir_name);
        fs::create_dir_all(&dir)?;

        let stem = format!(
            "{}_{}",
            article.id,
            article.scraped_date.format("%Y%m%d_%H%M%S")
        );
        let mut filename = format!("{stem}.json");
        let mut counter = 1;
        while dir.join(&filename).exists() {
            filename = format!("{stem}_{counter}.json");
            counter += 1;
        }

        let json = serde_json::to_string_pretty(article)?;
        fs::write(dir.join(&filename), json)?;

        let relative = format!("{dir_name}/{filename}");
        self.append_index(&IndexRecord::for_article(article, &relative))?;
        info!(path = %relative, "Persisted article");
        Ok(relative)
    }

    /// Append one row to the ledger. Called once per successful persistence,
    /// never batched, so a crash leaves a truncated-but-valid file.
    fn append_index(&self, record: &IndexRecord) -> Result<()> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.index_path())?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Names of the source subdirectories that exist under the root, sorted.
    pub fn list_source_dirs(&self) -> Result<Vec<String>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Load up to `limit` articles for one source directory, newest file
    /// modification time first. Unreadable files are logged and skipped.
    pub fn articles_for_source(&self, source_dir: &str, limit: usize) -> Result<Vec<Article>> {
        let dir = self.root.join(source_dir);
        let mut files: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                files.push((entry.metadata()?.modified()?, path));
            }
        }
        files.sort_by(|a, b| b.cmp(a));

        let mut articles = Vec::new();
        for (_, path) in files.into_iter().take(limit) {
            match fs::read_to_string(&path)
                .map_err(crate::error::ScrapeError::from)
                .and_then(|s| Ok(serde_json::from_str::<Article>(&s)?))
            {
                Ok(article) => articles.push(article),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable article file"),
            }
        }
        Ok(articles)
    }

    /// Paths of every persisted article file across all sources, sorted.
    pub fn article_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for dir_name in self.list_source_dirs()? {
            for entry in fs::read_dir(self.root.join(dir_name))? {
                let path = entry?.path();
                if path.extension().is_some_and(|e| e == "json") {
                    paths.push(path);
                }
            }
        }
        paths.sort();
        Ok(paths)
    }

    pub fn load_article(&self, path: &Path) -> Result<Article> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Rewrite an article file in place. Used only by the summary backfill
    /// pass; identity, filename, and the ledger row are unchanged.
    pub fn rewrite(&self, path: &Path, article: &Article) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(article)?)?;
        Ok(())
    }

    /// All ledger rows, in append order. An absent ledger reads as empty.
    pub fn index_records(&self) -> Result<Vec<IndexRecord>> {
        if !self.index_path().exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(self.index_path())?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    /// Ledger rows carrying the given topic, most recently scraped first,
    /// bounded by `limit`.
    pub fn records_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<IndexRecord>> {
        let mut records: Vec<IndexRecord> = self
            .index_records()?
            .into_iter()
            .filter(|r| r.topics().any(|t| t == topic))
            .collect();
        records.sort_by(|a, b| b.scraped_date.cmp(&a.scraped_date));
        records.truncate(limit);
        Ok(records)
    }

    /// Distinct topics seen anywhere in the ledger, sorted.
    pub fn topics(&self) -> Result<Vec<String>> {
        let mut topics: Vec<String> = Vec::new();
        for record in self.index_records()? {
            for topic in record.topics() {
                if !topics.iter().any(|t| t == topic) {
                    topics.push(topic.to_string());
                }
            }
        }
        topics.sort();
        Ok(topics)
    }
}

// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;
use crate::error::{Error, Result};

/// What one ingestion run should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub basho: String,   // YYYYMM
    pub force: bool,     // force-replace the event/basho scope instead of upsert
    pub use_cache: bool, // serve raw HTML from data/raw when present
    pub playoff: bool,   // detect and ingest the day-16 playoff page
}

impl RunOptions {
    pub fn new(basho: &str) -> Result<Self> {
        Ok(Self {
            basho: validate_basho(basho)?,
            force: false,
            use_cache: true,
            playoff: true,
        })
    }

    pub fn event_id(&self) -> String {
        regular_event_id(&self.basho)
    }
}

pub fn regular_event_id(basho: &str) -> String {
    join!("honbasho-", basho)
}

pub fn playoff_event_id(basho: &str) -> String {
    join!("honbasho-", basho, "-playoff")
}

/// Six digits, month 01..=12.
pub fn validate_basho(basho: &str) -> Result<String> {
    let b = basho.trim();
    let ok = b.len() == 6
        && b.chars().all(|c| c.is_ascii_digit())
        && matches!(b[4..].parse::<u32>(), Ok(1..=12));
    if ok { Ok(s!(b)) } else { Err(Error::InvalidBasho(s!(basho))) }
}

/// On-disk layout, anchored at the project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk up from the current directory looking for the project root.
    pub fn discover() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(find_root(&cwd))
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn fact_csv(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(FACT_SUBDIR).join(FACT_FILE)
    }

    pub fn dim_shikona_csv(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(DIM_SUBDIR).join(DIM_SHIKONA_FILE)
    }

    pub fn raw_dir(&self, event_id: &str) -> PathBuf {
        self.root.join(DATA_DIR).join(RAW_SUBDIR).join(event_id)
    }

    pub fn site_data_dir(&self) -> PathBuf {
        self.root.join(SITE_DATA_DIR)
    }
}

/// First ancestor (max ROOT_SEARCH_DEPTH levels) holding Cargo.toml or data/.
/// Falls back to `start` itself.
pub fn find_root(start: &Path) -> PathBuf {
    let mut p = start;
    for _ in 0..ROOT_SEARCH_DEPTH {
        if p.join(ROOT_MARKER).is_file() || p.join(DATA_DIR).is_dir() {
            return p.to_path_buf();
        }
        match p.parent() {
            Some(parent) => p = parent,
            None => break,
        }
    }
    start.to_path_buf()
}

pub fn results_cache_file(day: u32) -> String {
    format!("results_d{day:02}.html")
}

// src/error.rs
use thiserror::Error;

/// Crate-wide error. Only `Fetch` is expected during a normal run;
/// it means the site could not be reached after all retries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("invalid basho {0:?} (expected YYYYMM)")]
    InvalidBasho(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// src/core/net.rs
//
// Blocking HTTPS GET with retry + exponential backoff, and the raw HTML cache.

use std::{fs, path::Path, thread, time::Duration};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::consts::*;
use crate::error::{Error, Result};
use crate::file::write_whole;

pub fn results_url(basho: &str, day: u32) -> String {
    format!("{BASE_URL}/Results.aspx?b={basho}&d={day}")
}

pub fn banzuke_url(basho: &str) -> String {
    format!("{BASE_URL}/Banzuke.aspx?b={basho}")
}

pub fn rikishi_url(rid: u32) -> String {
    format!("{BASE_URL}/Rikishi.aspx?r={rid}")
}

/// Source of page HTML. The runner only ever talks to this.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String>;

    /// Pause after a real network fetch. No-op unless the fetcher hits the network.
    fn pace(&self) {}
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Fetch { url: s!(BASE_URL), reason: e.to_string() })?;
        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
        })
    }

    fn get_once(&self, url: &str) -> std::result::Result<String, String> {
        let resp = self.client.get(url).send().map_err(|e| format!("connection error: {e}"))?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        resp.text().map_err(|e| format!("body read error: {e}"))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let mut last = s!();
        for attempt in 1..=self.max_retries {
            debug!("Fetching {url} (attempt {attempt}/{})", self.max_retries);
            match self.get_once(url) {
                Ok(body) => {
                    debug!("OK {url}");
                    return Ok(body);
                }
                Err(reason) => {
                    warn!("{reason} for {url} (attempt {attempt}/{})", self.max_retries);
                    last = reason;
                }
            }
            if attempt < self.max_retries {
                let backoff = self.backoff_base * 2u32.pow(attempt - 1);
                debug!("Backoff {backoff:?} before retry");
                thread::sleep(backoff);
            }
        }
        Err(Error::Fetch { url: s!(url), reason: last })
    }

    fn pace(&self) {
        let ms = rand::thread_rng().gen_range(SLEEP_MIN_MS..=SLEEP_MAX_MS);
        thread::sleep(Duration::from_millis(ms)); // be polite
    }
}

/// Serve `url` from `cache_path` when caching is on and the file exists;
/// otherwise fetch, pace, and (when caching) save the body.
pub fn fetch_with_cache(
    fetcher: &dyn Fetcher,
    url: &str,
    cache_path: Option<&Path>,
    use_cache: bool,
) -> Result<String> {
    let cache_path = cache_path.filter(|_| use_cache);

    if let Some(p) = cache_path {
        if p.is_file() {
            info!("Cache hit: {}", p.display());
            return Ok(fs::read_to_string(p)?);
        }
    }

    let html = fetcher.fetch(url)?;
    fetcher.pace();

    if let Some(p) = cache_path {
        write_whole(p, &html)?;
        debug!("Cached to {}", p.display());
    }
    Ok(html)
}

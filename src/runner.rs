// src/runner.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::{
    config::consts::{BANZUKE_CACHE_FILE, PLAYOFF_CACHE_FILE, PLAYOFF_DAY, REGULAR_DAYS},
    config::options::{playoff_event_id, results_cache_file, Paths, RunOptions},
    core::net::{banzuke_url, fetch_with_cache, results_url, Fetcher},
    error::Result,
    model::{BoutMeta, BoutRecord, EventType, ShikonaRecord},
    progress::Progress,
    specs, store,
};

/// Summary of what one run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub event_id: String,
    /// Bouts merged per event id (regular, and playoff when present).
    pub bouts: BTreeMap<String, usize>,
    pub shikona: usize,
    pub playoff: bool,
    pub files_written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn total_bouts(&self) -> usize {
        self.bouts.values().sum()
    }
}

/// Everything gathered across pages before anything touches disk.
#[derive(Default)]
struct Harvest {
    bouts: BTreeMap<String, Vec<BoutRecord>>,
    shikona: Vec<ShikonaRecord>,
    last_day_html: Option<String>,
    playoff: bool,
}

impl Harvest {
    fn add_bouts(&mut self, records: Vec<BoutRecord>) {
        for r in records {
            self.bouts.entry(r.event_id.clone()).or_default().push(r);
        }
    }
}

/// Top-level runner: fetch days 1..=15, the banzuke and (optionally) the
/// playoff page, then merge everything into the two tables.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    opts: &RunOptions,
    paths: &Paths,
    fetcher: &dyn Fetcher,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let started = Instant::now();
    let event_id = opts.event_id();
    info!("Starting sumo_scrape for basho={} event_id={event_id}", opts.basho);
    info!("Options: force={} cache={} playoff={}", opts.force, opts.use_cache, opts.playoff);

    if let Some(p) = progress.as_deref_mut() {
        p.begin(REGULAR_DAYS as usize);
    }

    let outcome = harvest(opts, paths, fetcher, progress.as_deref_mut())
        .and_then(|h| merge(opts, paths, h));

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    let summary = outcome?;
    info!("=== Summary ===");
    info!("Event: {}", summary.event_id);
    for (eid, n) in &summary.bouts {
        info!("Fact rows [{eid}]: {n}");
    }
    info!("Dim shikona rows: {}", summary.shikona);
    info!("Elapsed: {:.1}s", started.elapsed().as_secs_f64());
    Ok(summary)
}

/* ---------------- Fetch + extract ---------------- */

fn harvest<'p>(
    opts: &RunOptions,
    paths: &Paths,
    fetcher: &dyn Fetcher,
    mut progress: Option<&mut (dyn Progress + 'p)>,
) -> Result<Harvest> {
    let basho = opts.basho.as_str();
    let event_id = opts.event_id();
    let cache_dir = paths.raw_dir(&event_id);
    let mut h = Harvest::default();

    for day in 1..=REGULAR_DAYS {
        let url = results_url(basho, day);
        let cache = cache_dir.join(results_cache_file(day));
        let meta = page_meta(&event_id, EventType::Regular, basho, day, &url);

        let html = fetch_with_cache(fetcher, &url, Some(&cache), opts.use_cache)?;
        let records = specs::results::parse_results_page(&html, &meta);
        info!("Day {day}: {} bouts", records.len());
        h.add_bouts(records);
        if day == REGULAR_DAYS {
            h.last_day_html = Some(html);
        }

        if let Some(p) = progress.as_deref_mut() {
            p.item_done(day);
        }
    }

    let url = banzuke_url(basho);
    let html = fetch_with_cache(fetcher, &url, Some(&cache_dir.join(BANZUKE_CACHE_FILE)), opts.use_cache)?;
    h.shikona = specs::banzuke::parse_banzuke_page(&html, basho, &url);
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Banzuke: {} rikishi", h.shikona.len()));
    }

    if opts.playoff {
        ingest_playoff(opts, &cache_dir, fetcher, &mut h)?;
    }
    Ok(h)
}

fn ingest_playoff(opts: &RunOptions, cache_dir: &Path, fetcher: &dyn Fetcher, h: &mut Harvest) -> Result<()> {
    let basho = opts.basho.as_str();
    let detected = h
        .last_day_html
        .as_deref()
        .is_some_and(|html| specs::playoff::detect_playoff(html, basho));
    if !detected {
        info!("No playoff detected for basho {basho}");
        return Ok(());
    }

    let event_id = playoff_event_id(basho);
    let url = results_url(basho, PLAYOFF_DAY);
    let meta = page_meta(&event_id, EventType::Playoff, basho, PLAYOFF_DAY, &url);
    let html = fetch_with_cache(fetcher, &url, Some(&cache_dir.join(PLAYOFF_CACHE_FILE)), opts.use_cache)?;
    let records = specs::results::parse_results_page(&html, &meta);
    info!("Playoff: {} bouts", records.len());

    h.add_bouts(records);
    h.playoff = true;
    Ok(())
}

fn page_meta(event_id: &str, event_type: EventType, basho: &str, day: u32, url: &str) -> BoutMeta {
    BoutMeta {
        event_id: s!(event_id),
        event_type,
        basho: s!(basho),
        day,
        source_url: s!(url),
        fetched_at: chrono::Utc::now().to_rfc3339(),
    }
}

/* ---------------- Merge ---------------- */

fn merge(opts: &RunOptions, paths: &Paths, h: Harvest) -> Result<RunSummary> {
    let fact = paths.fact_csv();
    let dim = paths.dim_shikona_csv();
    let mut summary = RunSummary {
        event_id: opts.event_id(),
        playoff: h.playoff,
        ..RunSummary::default()
    };

    // Empty events are never merged, so a forced run cannot clear stored rows.
    if !h.bouts.contains_key(&summary.event_id) {
        warn!("No bouts parsed for {}; stored rows left as they are", summary.event_id);
    }
    for (eid, records) in &h.bouts {
        store::update_bouts(records, &fact, opts.force, eid)?;
        summary.bouts.insert(eid.clone(), records.len());
    }
    if !summary.bouts.is_empty() {
        summary.files_written.push(fact);
    }

    if h.shikona.is_empty() {
        warn!("No banzuke rows parsed for {}; stored rows left as they are", opts.basho);
    } else {
        store::update_shikona(&h.shikona, &dim, opts.force, &opts.basho)?;
        summary.files_written.push(dim);
    }
    summary.shikona = h.shikona.len();
    Ok(summary)
}

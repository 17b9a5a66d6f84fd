// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::config::options::{Paths, RunOptions};
use crate::core::net::HttpFetcher;
use crate::progress::Progress;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "INFO")]
    Info,
    #[value(name = "DEBUG")]
    Debug,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self { LogLevel::Info => "INFO", LogLevel::Debug => "DEBUG" }
    }
}

/// Fetch sumo bout data from SumoDB and merge it into CSV tables.
#[derive(Debug, Parser)]
#[command(name = "sumo_scrape", version)]
pub struct Args {
    /// Target basho in YYYYMM format (e.g. 202601)
    #[arg(long)]
    pub basho: String,

    /// Force replace rows for the target event (default: upsert)
    #[arg(long)]
    pub force: bool,

    /// Raw HTML cache under data/raw
    #[arg(long, value_enum, default_value = "on")]
    pub raw_cache: Toggle,

    /// Playoff detection and fetch
    #[arg(long, value_enum, default_value = "on")]
    pub playoff: Toggle,

    #[arg(long, value_enum, default_value = "INFO", ignore_case = true)]
    pub log_level: LogLevel,

    /// Project root (default: walk up from the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl Args {
    pub fn run_options(&self) -> crate::error::Result<RunOptions> {
        let mut opts = RunOptions::new(&self.basho)?;
        opts.force = self.force;
        opts.use_cache = self.raw_cache.is_on();
        opts.playoff = self.playoff.is_on();
        Ok(opts)
    }

    pub fn paths(&self) -> Paths {
        match &self.root {
            Some(root) => Paths::new(root),
            None => Paths::discover(),
        }
    }
}

/// Progress lines for a terminal run.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        info!("{msg}");
    }

    fn item_done(&mut self, day: u32) {
        self.done += 1;
        info!("[{}/{}] day {day} done", self.done, self.total);
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(args.log_level.as_str());

    let opts = args.run_options()?;
    let paths = args.paths();
    info!("Project root: {}", paths.root().display());

    let fetcher = HttpFetcher::new()?;
    let mut progress = ConsoleProgress::default();
    let summary = crate::runner::run(&opts, &paths, &fetcher, Some(&mut progress))
        .wrap_err_with(|| format!("ingestion failed for basho {}", opts.basho))?;

    info!(
        "Done: {} bouts, {} shikona rows{}",
        summary.total_bouts(),
        summary.shikona,
        if summary.playoff { " (with playoff)" } else { "" },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["sumo_scrape", "--basho", "202501"]).unwrap();
        let opts = args.run_options().unwrap();
        assert!(!opts.force);
        assert!(opts.use_cache);
        assert!(opts.playoff);
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn toggles_and_level() {
        let args = Args::try_parse_from([
            "sumo_scrape", "--basho", "202503", "--force",
            "--raw-cache", "off", "--playoff", "off", "--log-level", "DEBUG",
        ])
        .unwrap();
        let opts = args.run_options().unwrap();
        assert!(opts.force);
        assert!(!opts.use_cache);
        assert!(!opts.playoff);
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn bad_basho_rejected() {
        let args = Args::try_parse_from(["sumo_scrape", "--basho", "202513"]).unwrap();
        assert!(args.run_options().is_err());
        assert!(Args::try_parse_from(["sumo_scrape"]).is_err());
    }
}

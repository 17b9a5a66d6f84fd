// src/bin/site_data.rs
//
// Build the JSON files the static site reads, from the two CSV tables.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use sumo_scrape::config::options::Paths;
use sumo_scrape::{log, report, store};

/// Build JSON data files for the sumo visualization site.
#[derive(Debug, Parser)]
#[command(name = "site_data", version)]
struct Args {
    /// Project root (default: walk up from the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Output directory (default: <root>/docs/data)
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value = "INFO")]
    log_level: String,
}

fn run() -> Result<()> {
    let args = Args::parse();
    log::init(&args.log_level);

    let paths = args.root.as_ref().map(Paths::new).unwrap_or_else(Paths::discover);
    let out_dir = args.out.clone().unwrap_or_else(|| paths.site_data_dir());

    info!("Loading data...");
    let bouts = store::read_table(&paths.fact_csv())
        .wrap_err_with(|| format!("reading {}", paths.fact_csv().display()))?;
    let dim = store::read_table(&paths.dim_shikona_csv())
        .wrap_err_with(|| format!("reading {}", paths.dim_shikona_csv().display()))?;
    info!("  {} bouts, {} dim rows", bouts.len(), dim.len());

    let written = report::build_all(&bouts, &dim, &out_dir)?;
    info!("Done! {} files in {}", written.len(), out_dir.display());
    Ok(())
}

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("Error: {e}");
    }
    if let Err(e) = run() {
        tracing::error!("Fatal error: {e:#}");
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

// src/bin/cli.rs
use sumo_scrape::cli;

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("Error: {e}");
    }
    if let Err(e) = cli::run() {
        tracing::error!("Fatal error: {e:#}");
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

// src/log.rs
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber.
/// `level` is the CLI default ("INFO" / "DEBUG"); RUST_LOG overrides it.
pub fn init(level: &str) {
    let default = join!("sumo_scrape=", &level.to_ascii_lowercase(), ",warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests, repeated runs in one process) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}

// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://sumodb.sumogames.de";
pub const USER_AGENT: &str = concat!("sumo_scrape/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 30;
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_BASE_MS: u64 = 1_000; // 1s, 2s, 4s…

// Be polite: random pause after every real fetch
pub const SLEEP_MIN_MS: u64 = 500;
pub const SLEEP_MAX_MS: u64 = 1_500;

// Tournament shape
pub const REGULAR_DAYS: u32 = 15;
pub const PLAYOFF_DAY: u32 = 16;

// Layout under the project root
pub const DATA_DIR: &str = "data";
pub const FACT_SUBDIR: &str = "fact";
pub const DIM_SUBDIR: &str = "dim";
pub const RAW_SUBDIR: &str = "raw";
pub const FACT_FILE: &str = "fact_bout_daily.csv";
pub const DIM_SHIKONA_FILE: &str = "dim_shikona_by_basho.csv";
pub const SITE_DATA_DIR: &str = "docs/data";

// Raw HTML cache names
pub const BANZUKE_CACHE_FILE: &str = "banzuke.html";
pub const PLAYOFF_CACHE_FILE: &str = "playoff.html";

// Root discovery
pub const ROOT_MARKER: &str = "Cargo.toml";
pub const ROOT_SEARCH_DEPTH: usize = 10;

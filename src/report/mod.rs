// src/report/mod.rs
//
// Site data: JSON summaries computed from the two tables.
// Input rows come straight from `store::read_table`, so every field is a string
// and anything unparseable degrades to 0 / empty rather than failing the build.
//
// Across every report, `kyujo` and `unknown` rows are neither wins nor losses.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::Result;
use crate::file::{ensure_directory, write_whole};
use crate::model::{Division, ResultType, Side};
use crate::store::{field, Row};

pub mod rankings;
pub mod senshuraku;
pub mod streaks;
pub mod yokozuna;

pub use rankings::{
    kimarite_ranking, kimarite_trend, rikishi_wins, summary_stats, upset_index,
    KimariteCount, KimariteRanking, KimariteTrend, RikishiWins, SummaryStats, UpsetIndex,
};
pub use senshuraku::{nanahachi_analysis, star_trading_analysis, NanahachiAnalysis, StarTradingAnalysis};
pub use streaks::{winning_streaks, WinningStreak};
pub use yokozuna::{yokozuna_dominance, YokozunaDominance};

pub const KIMARITE_RANKING_FILE: &str = "kimarite_ranking.json";
pub const KIMARITE_TREND_FILE: &str = "kimarite_trend.json";
pub const RIKISHI_WINS_FILE: &str = "rikishi_wins.json";
pub const YOKOZUNA_DOMINANCE_FILE: &str = "yokozuna_dominance.json";
pub const UPSET_INDEX_FILE: &str = "upset_index.json";
pub const WINNING_STREAKS_FILE: &str = "winning_streaks.json";
pub const SUMMARY_STATS_FILE: &str = "summary_stats.json";
pub const NANAHACHI_ANALYSIS_FILE: &str = "nanahachi_analysis.json";
pub const STAR_TRADING_ANALYSIS_FILE: &str = "star_trading_analysis.json";

/* ---------------- Typed view over a bout row ---------------- */

/// Borrowed view of one fact row with the fields the reports need.
#[derive(Clone, Copy, Debug)]
pub struct BoutView<'a> {
    pub basho: &'a str,
    pub day: u32,
    pub division: &'a str,
    pub bout_no: u32,
    pub east_rid: u32,
    pub west_rid: u32,
    pub winner_side: &'a str,
    pub kimarite: &'a str,
    pub east_rank: &'a str,
    pub west_rank: &'a str,
    /// `None` when the column holds something unrecognized.
    pub result_type: Option<ResultType>,
}

impl<'a> BoutView<'a> {
    pub fn from_row(row: &'a Row) -> Self {
        let num = |col: &str| field(row, col).trim().parse::<u32>().unwrap_or(0);
        Self {
            basho: field(row, "basho"),
            day: num("day"),
            division: field(row, "division"),
            bout_no: num("bout_no"),
            east_rid: num("east_rid"),
            west_rid: num("west_rid"),
            winner_side: field(row, "winner_side"),
            kimarite: field(row, "kimarite"),
            east_rank: field(row, "east_rank"),
            west_rank: field(row, "west_rank"),
            result_type: field(row, "result_type").parse().ok(),
        }
    }

    pub fn is_makuuchi(&self) -> bool {
        self.division == Division::Makuuchi.as_str()
    }

    pub fn is_fusen(&self) -> bool {
        self.result_type == Some(ResultType::Fusen)
    }

    pub fn is_playoff(&self) -> bool {
        self.result_type == Some(ResultType::Playoff)
    }

    /// Calendar year from the basho id (`202501` → 2025).
    pub fn year(&self) -> Option<u32> {
        self.basho.get(..4)?.parse().ok()
    }

    /// Side that won, if the bout counts as a decided contest.
    /// Absences and unreadable rows are neither wins nor losses.
    pub fn winner(&self) -> Option<Side> {
        match self.result_type? {
            ResultType::Kyujo | ResultType::Unknown => None,
            _ => Side::from_code(self.winner_side),
        }
    }

    /// (winner rid, loser rid) for decided bouts.
    pub fn winner_loser(&self) -> Option<(u32, u32)> {
        match self.winner()? {
            Side::East => Some((self.east_rid, self.west_rid)),
            Side::West => Some((self.west_rid, self.east_rid)),
        }
    }
}

pub fn views(rows: &[Row]) -> Vec<BoutView<'_>> {
    rows.iter().map(BoutView::from_row).collect()
}

/* ---------------- Shared helpers ---------------- */

pub(crate) fn pct(part: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { round1(part as f64 / total as f64 * 100.0) }
}

/// Like `pct`, but an empty sample is `None` (serialized as `null`).
pub(crate) fn pct_opt(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| pct(part, total))
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// {rid: shikona} taken from each wrestler's latest basho in the dimension table.
pub fn latest_shikona(dim: &[Row]) -> BTreeMap<u32, String> {
    let mut best: BTreeMap<u32, (&str, &str)> = BTreeMap::new();
    for row in dim {
        let Ok(rid) = field(row, "rid").trim().parse::<u32>() else { continue };
        let basho = field(row, "basho");
        let name = field(row, "shikona_at_basho");
        if best.get(&rid).is_none_or(|(b, _)| basho > *b) {
            best.insert(rid, (basho, name));
        }
    }
    best.into_iter().map(|(rid, (_, name))| (rid, s!(name))).collect()
}

pub(crate) fn name_of(names: &BTreeMap<u32, String>, rid: u32) -> String {
    names.get(&rid).cloned().unwrap_or_else(|| rid.to_string())
}

/// Counts sorted by count desc, then key, cut to `n`.
pub(crate) fn top_counts<K: Ord>(counts: BTreeMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut items: Vec<_> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items.truncate(n);
    items
}

/// Serialize `(key, value)` pairs as a JSON object in the given order.
pub(crate) fn ordered_map<S, K, V>(pairs: &[(K, V)], s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    V: Serialize,
{
    s.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

/* ---------------- Output ---------------- */

/// Pretty JSON, UTF-8, non-ASCII kept as-is.
pub fn write_json<T: Serialize>(dir: &Path, filename: &str, data: &T) -> Result<PathBuf> {
    ensure_directory(dir)?;
    let path = dir.join(filename);
    let text = serde_json::to_string_pretty(data)?;
    write_whole(&path, &text)?;
    info!("  wrote {} ({} bytes)", path.display(), text.len());
    Ok(path)
}

/// Build every report from the two tables and write them into `out_dir`.
pub fn build_all(bouts: &[Row], dim: &[Row], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let v = views(bouts);
    Ok(vec![
        write_json(out_dir, KIMARITE_RANKING_FILE, &kimarite_ranking(&v))?,
        write_json(out_dir, KIMARITE_TREND_FILE, &kimarite_trend(&v))?,
        write_json(out_dir, RIKISHI_WINS_FILE, &rikishi_wins(&v, dim))?,
        write_json(out_dir, YOKOZUNA_DOMINANCE_FILE, &yokozuna_dominance(&v, dim))?,
        write_json(out_dir, UPSET_INDEX_FILE, &upset_index(&v))?,
        write_json(out_dir, WINNING_STREAKS_FILE, &winning_streaks(&v, dim))?,
        write_json(out_dir, SUMMARY_STATS_FILE, &summary_stats(&v, dim))?,
        write_json(out_dir, NANAHACHI_ANALYSIS_FILE, &nanahachi_analysis(&v))?,
        write_json(out_dir, STAR_TRADING_ANALYSIS_FILE, &star_trading_analysis(&v, dim))?,
    ])
}

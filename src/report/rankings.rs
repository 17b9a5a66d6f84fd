// src/report/rankings.rs
//
// Whole-history tallies: techniques, wins, upsets, headline numbers.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{latest_shikona, name_of, ordered_map, pct, round1, top_counts, BoutView};
use crate::model::Side;
use crate::rank::rank_to_numeric;
use crate::store::Row;

const TOP_KIMARITE: usize = 20;
const TOP_TREND: usize = 5;
const TOP_RIKISHI: usize = 30;

/// Bouts that carry a real technique.
fn with_technique<'v, 'a>(bouts: &'v [BoutView<'a>]) -> impl Iterator<Item = &'v BoutView<'a>> {
    bouts.iter().filter(|b| !b.is_fusen() && !b.kimarite.is_empty())
}

/* ---------------- kimarite_ranking ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KimariteCount {
    pub kimarite: String,
    pub count: usize,
    pub pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KimariteRanking {
    pub makuuchi: Vec<KimariteCount>,
    pub all: Vec<KimariteCount>,
}

pub fn kimarite_ranking(bouts: &[BoutView]) -> KimariteRanking {
    let mut maku: BTreeMap<&str, usize> = BTreeMap::new();
    let mut all: BTreeMap<&str, usize> = BTreeMap::new();
    let (mut maku_total, mut all_total) = (0, 0);

    for b in with_technique(bouts) {
        *all.entry(b.kimarite).or_default() += 1;
        all_total += 1;
        if b.is_makuuchi() {
            *maku.entry(b.kimarite).or_default() += 1;
            maku_total += 1;
        }
    }

    let rank = |counts: BTreeMap<&str, usize>, total: usize| -> Vec<KimariteCount> {
        top_counts(counts, TOP_KIMARITE)
            .into_iter()
            .map(|(k, c)| KimariteCount { kimarite: s!(k), count: c, pct: pct(c, total) })
            .collect()
    };
    KimariteRanking { makuuchi: rank(maku, maku_total), all: rank(all, all_total) }
}

/* ---------------- kimarite_trend ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KimariteTrend {
    pub years: Vec<u32>,
    /// Top Makuuchi techniques, most common first; one yearly share (%) per entry of `years`.
    #[serde(serialize_with = "ordered_map")]
    pub techniques: Vec<(String, Vec<f64>)>,
}

pub fn kimarite_trend(bouts: &[BoutView]) -> KimariteTrend {
    let maku: Vec<&BoutView> = with_technique(bouts).filter(|b| b.is_makuuchi()).collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for b in &maku {
        *counts.entry(b.kimarite).or_default() += 1;
    }
    let top: Vec<&str> = top_counts(counts, TOP_TREND).into_iter().map(|(k, _)| k).collect();

    let mut year_total: BTreeMap<u32, usize> = BTreeMap::new();
    let mut year_tech: BTreeMap<(u32, &str), usize> = BTreeMap::new();
    for b in &maku {
        let Some(year) = b.year() else { continue };
        *year_total.entry(year).or_default() += 1;
        if top.contains(&b.kimarite) {
            *year_tech.entry((year, b.kimarite)).or_default() += 1;
        }
    }

    let years: Vec<u32> = year_total.keys().copied().collect();
    let techniques = top
        .iter()
        .map(|&k| {
            let shares = year_total
                .iter()
                .map(|(&y, &total)| pct(year_tech.get(&(y, k)).copied().unwrap_or(0), total))
                .collect();
            (s!(k), shares)
        })
        .collect();
    KimariteTrend { years, techniques }
}

/* ---------------- rikishi_wins ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RikishiWins {
    pub rank: usize,
    pub shikona: String,
    pub wins: usize,
    pub losses: usize,
    pub basho_count: usize,
    pub win_rate: f64,
}

#[derive(Default)]
struct Tally<'a> {
    wins: usize,
    losses: usize,
    basho: BTreeSet<&'a str>,
}

pub fn rikishi_wins(bouts: &[BoutView], dim: &[Row]) -> Vec<RikishiWins> {
    let names = latest_shikona(dim);
    let mut tally: BTreeMap<u32, Tally> = BTreeMap::new();

    for b in bouts.iter().filter(|b| b.is_makuuchi()) {
        for rid in [b.east_rid, b.west_rid].into_iter().filter(|&r| r != 0) {
            tally.entry(rid).or_default().basho.insert(b.basho);
        }
        if let Some((w, l)) = b.winner_loser() {
            if w != 0 { tally.entry(w).or_default().wins += 1; }
            if l != 0 { tally.entry(l).or_default().losses += 1; }
        }
    }

    let mut ranked: Vec<(u32, Tally)> = tally.into_iter().filter(|(_, t)| t.wins > 0).collect();
    ranked.sort_by(|a, b| b.1.wins.cmp(&a.1.wins).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(TOP_RIKISHI)
        .enumerate()
        .map(|(i, (rid, t))| RikishiWins {
            rank: i + 1,
            shikona: name_of(&names, rid),
            wins: t.wins,
            losses: t.losses,
            basho_count: t.basho.len(),
            win_rate: pct(t.wins, t.wins + t.losses),
        })
        .collect()
}

/* ---------------- upset_index ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpsetIndex {
    pub basho_list: Vec<String>,
    pub upset_rate: Vec<f64>,
    pub avg_upset_rate: f64,
}

/// Share of decided Makuuchi bouts won by the lower-ranked wrestler, per basho.
/// Bouts where either rank is unreadable are left out of the denominator.
pub fn upset_index(bouts: &[BoutView]) -> UpsetIndex {
    // basho -> (bouts, upsets)
    let mut per_basho: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for b in bouts.iter().filter(|b| b.is_makuuchi()) {
        let (Some(east), Some(west)) = (rank_to_numeric(b.east_rank), rank_to_numeric(b.west_rank)) else {
            continue;
        };
        let Some(winner) = b.winner() else { continue };
        let entry = per_basho.entry(b.basho).or_default();
        entry.0 += 1;
        let upset = match winner {
            Side::East => east > west,
            Side::West => west > east,
        };
        if upset {
            entry.1 += 1;
        }
    }

    let basho_list: Vec<String> = per_basho.keys().map(|b| s!(*b)).collect();
    let upset_rate: Vec<f64> = per_basho.values().map(|&(n, u)| pct(u, n)).collect();
    let avg_upset_rate = if upset_rate.is_empty() {
        0.0
    } else {
        round1(upset_rate.iter().sum::<f64>() / upset_rate.len() as f64)
    };
    UpsetIndex { basho_list, upset_rate, avg_upset_rate }
}

/* ---------------- summary_stats ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_bouts: usize,
    pub total_basho: usize,
    pub total_rikishi: usize,
    pub year_range: String,
    pub makuuchi_bouts: usize,
    pub most_common_kimarite: String,
    pub most_wins_rikishi: String,
}

pub fn summary_stats(bouts: &[BoutView], dim: &[Row]) -> SummaryStats {
    let names = latest_shikona(dim);

    let basho: BTreeSet<&str> = bouts.iter().map(|b| b.basho).collect();
    let rikishi: BTreeSet<u32> = bouts
        .iter()
        .flat_map(|b| [b.east_rid, b.west_rid])
        .filter(|&r| r != 0)
        .collect();
    let years: BTreeSet<&str> = basho.iter().filter_map(|b| b.get(..4)).collect();
    let year_range = match (years.first(), years.last()) {
        (Some(a), Some(b)) => format!("{a}-{b}"),
        _ => s!(),
    };

    let mut kimarite: BTreeMap<&str, usize> = BTreeMap::new();
    for b in with_technique(bouts) {
        *kimarite.entry(b.kimarite).or_default() += 1;
    }
    let most_common_kimarite = top_counts(kimarite, 1)
        .first()
        .map(|(k, _)| s!(*k))
        .unwrap_or_default();

    let mut wins: BTreeMap<u32, usize> = BTreeMap::new();
    for b in bouts.iter().filter(|b| b.is_makuuchi()) {
        if let Some((w, _)) = b.winner_loser().filter(|(w, _)| *w != 0) {
            *wins.entry(w).or_default() += 1;
        }
    }
    let most_wins_rikishi = wins
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(&rid, _)| name_of(&names, rid))
        .unwrap_or_default();

    SummaryStats {
        total_bouts: bouts.len(),
        total_basho: basho.len(),
        total_rikishi: rikishi.len(),
        year_range,
        makuuchi_bouts: bouts.iter().filter(|b| b.is_makuuchi()).count(),
        most_common_kimarite,
        most_wins_rikishi,
    }
}

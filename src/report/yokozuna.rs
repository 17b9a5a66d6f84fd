// src/report/yokozuna.rs
//
// Per-basho Makuuchi records of every wrestler while ranked yokozuna.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{latest_shikona, name_of, pct, BoutView};
use crate::store::{field, Row};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YokozunaBasho {
    pub basho: String,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YokozunaRecord {
    pub shikona: String,
    pub rid: u32,
    pub data: Vec<YokozunaBasho>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YokozunaDominance {
    pub rikishi: Vec<YokozunaRecord>,
}

/// rid -> basho where the banzuke lists them as `Ye`/`Yw`.
fn yokozuna_basho(dim: &[Row]) -> BTreeMap<u32, BTreeSet<&str>> {
    let mut out: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    for row in dim.iter().filter(|r| matches!(field(r, "rank"), "Ye" | "Yw")) {
        let Ok(rid) = field(row, "rid").trim().parse::<u32>() else { continue };
        out.entry(rid).or_default().insert(field(row, "basho"));
    }
    out
}

pub fn yokozuna_dominance(bouts: &[BoutView], dim: &[Row]) -> YokozunaDominance {
    let names = latest_shikona(dim);
    let ranked = yokozuna_basho(dim);
    let is_yokozuna = |rid: u32, basho: &str| ranked.get(&rid).is_some_and(|b| b.contains(basho));

    // (rid, basho) -> (wins, losses)
    let mut stats: BTreeMap<(u32, &str), (usize, usize)> = BTreeMap::new();
    for b in bouts.iter().filter(|b| b.is_makuuchi()) {
        let Some((w, l)) = b.winner_loser() else { continue };
        if is_yokozuna(w, b.basho) {
            stats.entry((w, b.basho)).or_default().0 += 1;
        }
        if is_yokozuna(l, b.basho) {
            stats.entry((l, b.basho)).or_default().1 += 1;
        }
    }

    let mut rikishi: Vec<YokozunaRecord> = Vec::new();
    for ((rid, basho), (wins, losses)) in stats {
        if rikishi.last().is_none_or(|r| r.rid != rid) {
            rikishi.push(YokozunaRecord { shikona: name_of(&names, rid), rid, data: Vec::new() });
        }
        if let Some(r) = rikishi.last_mut() {
            r.data.push(YokozunaBasho {
                basho: s!(basho),
                wins,
                losses,
                win_rate: pct(wins, wins + losses),
            });
        }
    }
    YokozunaDominance { rikishi }
}

// src/report/streaks.rs
//
// Longest Makuuchi winning streaks, carried across basho.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{latest_shikona, name_of, BoutView};
use crate::store::Row;

const TOP_STREAKS: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WinningStreak {
    pub rank: usize,
    pub shikona: String,
    pub streak: usize,
    pub start_basho: String,
    pub end_basho: String,
    pub start_day: u32,
    /// Day of the loss that ended the streak; `0` (and an empty basho) while still running.
    pub end_day: u32,
}

#[derive(Clone, Copy)]
struct Run<'a> {
    count: usize,
    start: (&'a str, u32),
}

#[derive(Clone, Copy)]
struct Best<'a> {
    count: usize,
    start: (&'a str, u32),
    end: (&'a str, u32),
}

/// Bouts in the order they were fought: basho, day, bout number.
fn chronological<'v, 'a>(bouts: &'v [BoutView<'a>]) -> Vec<&'v BoutView<'a>> {
    let mut maku: Vec<&BoutView> = bouts.iter().filter(|b| b.is_makuuchi()).collect();
    maku.sort_by(|a, b| (a.basho, a.day, a.bout_no).cmp(&(b.basho, b.day, b.bout_no)));
    maku
}

/// Keep the first streak of each length; a later one must be strictly longer.
fn record<'a>(best: &mut BTreeMap<u32, Best<'a>>, rid: u32, run: Run<'a>, end: (&'a str, u32)) {
    if best.get(&rid).is_none_or(|b| run.count > b.count) {
        best.insert(rid, Best { count: run.count, start: run.start, end });
    }
}

/// Fusen, kyujo and unreadable bouts neither extend nor break a streak.
pub fn winning_streaks(bouts: &[BoutView], dim: &[Row]) -> Vec<WinningStreak> {
    let names = latest_shikona(dim);
    let mut current: BTreeMap<u32, Run> = BTreeMap::new();
    let mut best: BTreeMap<u32, Best> = BTreeMap::new();

    for b in chronological(bouts).into_iter().filter(|b| !b.is_fusen()) {
        let Some((winner, loser)) = b.winner_loser() else { continue };
        if winner != 0 {
            current
                .entry(winner)
                .and_modify(|r| r.count += 1)
                .or_insert(Run { count: 1, start: (b.basho, b.day) });
        }
        if let Some(run) = current.remove(&loser) {
            record(&mut best, loser, run, (b.basho, b.day));
        }
    }
    for (rid, run) in current {
        record(&mut best, rid, run, ("", 0));
    }

    let mut ranked: Vec<(u32, Best)> = best.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(TOP_STREAKS)
        .enumerate()
        .map(|(i, (rid, s))| WinningStreak {
            rank: i + 1,
            shikona: name_of(&names, rid),
            streak: s.count,
            start_basho: s!(s.start.0),
            end_basho: s!(s.end.0),
            start_day: s.start.1,
            end_day: s.end.1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::bout;
    use crate::report::views;

    #[test]
    fn streak_spans_basho_and_ends_on_a_loss() {
        let rows = vec![
            // Out of order on purpose: sorted by basho, day before counting.
            bout("202501", 1, "Makuuchi", (1, 3), "E", "yorikiri", ("Ye", "O1w"), "normal"),
            bout("202411", 14, "Makuuchi", (1, 2), "E", "yorikiri", ("Ye", "M1w"), "normal"),
            bout("202411", 15, "Makuuchi", (1, 3), "E", "oshidashi", ("Ye", "O1w"), "normal"),
            bout("202501", 2, "Makuuchi", (1, 4), "E", "fusen", ("Ye", "M2w"), "fusen"),
            bout("202501", 3, "Makuuchi", (1, 0), "", "", ("Ye", ""), "kyujo"),
            bout("202501", 4, "Makuuchi", (2, 1), "E", "hatakikomi", ("M1e", "Ye"), "normal"),
            bout("202501", 5, "Makuuchi", (1, 3), "E", "yorikiri", ("Ye", "O1w"), "normal"),
            bout("202501", 6, "Juryo", (8, 9), "E", "yorikiri", ("J1e", "J1w"), "normal"),
        ];
        let s = winning_streaks(&views(&rows), &[]);

        let top = &s[0];
        assert_eq!((top.rank, top.shikona.as_str(), top.streak), (1, "1", 3));
        assert_eq!((top.start_basho.as_str(), top.start_day), ("202411", 14));
        assert_eq!((top.end_basho.as_str(), top.end_day), ("202501", 4));

        // rid 2's win on day 4 is still running.
        let open = s.iter().find(|w| w.shikona == "2").unwrap();
        assert_eq!((open.streak, open.end_basho.as_str(), open.end_day), (1, "", 0));

        assert!(s.iter().all(|w| w.shikona != "8"));
    }
}

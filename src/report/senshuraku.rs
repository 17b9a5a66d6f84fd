// src/report/senshuraku.rs
//
// Final-day (senshuraku) analyses: how 7-7 wrestlers fare on day 15, and the
// patterns that point at traded bouts.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{latest_shikona, name_of, pct, pct_opt, BoutView};
use crate::model::{ResultType, Side};
use crate::rank::rank_to_numeric;
use crate::store::Row;

const FINAL_DAY: u32 = 15;
const EVEN: Record = Record { wins: 7, losses: 7 };
/// A record needs this many wins for kachikoshi.
const MAJORITY: u32 = 8;
const MATRIX_MIN_BOUTS: usize = 10;
const TOP_MATCHUPS: usize = 30;
const TOP_PAIRS: usize = 15;

/// Win-loss record entering day 15.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    fn label(self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

type Records<'a> = BTreeMap<(&'a str, u32), Record>;

/// Makuuchi records over days 1-14 of each basho, keyed by (basho, rid).
/// Playoffs never count.
fn records_entering_final_day<'a>(bouts: &[BoutView<'a>]) -> Records<'a> {
    let mut out = Records::new();
    for b in bouts.iter().filter(|b| b.is_makuuchi() && !b.is_playoff() && b.day < FINAL_DAY) {
        let Some((w, l)) = b.winner_loser() else { continue };
        if w != 0 { out.entry((b.basho, w)).or_default().wins += 1; }
        if l != 0 { out.entry((b.basho, l)).or_default().losses += 1; }
    }
    out
}

/// A decided regular day-15 Makuuchi bout with both records known.
struct FinalBout<'a> {
    basho: &'a str,
    year: u32,
    east_rid: u32,
    west_rid: u32,
    east: Record,
    west: Record,
    winner: Side,
}

impl FinalBout<'_> {
    /// (own record, opponent record, won) from one side.
    fn from_side(&self, side: Side) -> (Record, Record, bool) {
        match side {
            Side::East => (self.east, self.west, self.winner == Side::East),
            Side::West => (self.west, self.east, self.winner == Side::West),
        }
    }
}

fn final_day_bouts<'a>(bouts: &[BoutView<'a>], records: &Records<'a>) -> Vec<FinalBout<'a>> {
    bouts
        .iter()
        .filter(|b| b.is_makuuchi() && b.day == FINAL_DAY && !b.is_playoff())
        .filter_map(|b| {
            Some(FinalBout {
                basho: b.basho,
                year: b.year()?,
                east_rid: b.east_rid,
                west_rid: b.west_rid,
                east: *records.get(&(b.basho, b.east_rid))?,
                west: *records.get(&(b.basho, b.west_rid))?,
                winner: b.winner()?,
            })
        })
        .collect()
}

/// (bouts, wins)
#[derive(Clone, Copy, Debug, Default)]
struct Count {
    bouts: usize,
    wins: usize,
}

impl Count {
    fn add(&mut self, won: bool) {
        self.bouts += 1;
        if won {
            self.wins += 1;
        }
    }
}

/* ---------------- nanahachi_analysis ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NanahachiOverall {
    pub total_bouts: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub expected_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ByOpponentRecord {
    pub opp_record: String,
    pub bouts: usize,
    pub wins: usize,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ByYear {
    pub year: u32,
    pub bouts: usize,
    pub wins: usize,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BothEven {
    pub total_bouts: usize,
    pub east_wins: usize,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NanahachiAnalysis {
    pub overall: NanahachiOverall,
    pub by_opponent_record: Vec<ByOpponentRecord>,
    pub by_year: Vec<ByYear>,
    pub both_77: BothEven,
}

/// Day-15 win rate of wrestlers entering at 7-7. When both are 7-7 the bout
/// is counted once, from the east side.
pub fn nanahachi_analysis(bouts: &[BoutView]) -> NanahachiAnalysis {
    let records = records_entering_final_day(bouts);

    let mut overall = Count::default();
    let mut by_opp: BTreeMap<Record, Count> = BTreeMap::new();
    let mut by_year: BTreeMap<u32, Count> = BTreeMap::new();
    let mut both = Count::default();

    for fb in final_day_bouts(bouts, &records) {
        let side = match (fb.east == EVEN, fb.west == EVEN) {
            (true, true) => {
                both.add(fb.winner == Side::East);
                Side::East
            }
            (true, false) => Side::East,
            (false, true) => Side::West,
            (false, false) => continue,
        };
        let (_, opp, won) = fb.from_side(side);
        overall.add(won);
        by_opp.entry(opp).or_default().add(won);
        by_year.entry(fb.year).or_default().add(won);
    }

    let mut by_opp: Vec<(Record, Count)> = by_opp.into_iter().collect();
    by_opp.sort_by(|a, b| b.1.bouts.cmp(&a.1.bouts).then_with(|| a.0.cmp(&b.0)));

    NanahachiAnalysis {
        overall: NanahachiOverall {
            total_bouts: overall.bouts,
            wins: overall.wins,
            win_rate: pct(overall.wins, overall.bouts),
            expected_rate: 50.0,
        },
        by_opponent_record: by_opp
            .into_iter()
            .map(|(r, c)| ByOpponentRecord {
                opp_record: r.label(),
                bouts: c.bouts,
                wins: c.wins,
                win_rate: pct(c.wins, c.bouts),
            })
            .collect(),
        by_year: by_year
            .into_iter()
            .map(|(year, c)| ByYear { year, bouts: c.bouts, wins: c.wins, win_rate: pct(c.wins, c.bouts) })
            .collect(),
        both_77: BothEven {
            total_bouts: both.bouts,
            east_wins: both.wins,
            note: s!("Both 7-7: no incentive asymmetry, expect ~50%"),
        },
    }
}

/* ---------------- star_trading_analysis ---------------- */

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordMatchup {
    pub wrestler_record: String,
    pub opponent_record: String,
    pub bouts: usize,
    pub wrestler_wins: usize,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearlyTrend {
    pub year: u32,
    pub nanahachi_vs_kachikoshi_bouts: usize,
    pub nanahachi_vs_kachikoshi_rate: Option<f64>,
    pub baseline_bouts: usize,
    pub baseline_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FavorPair {
    pub rikishi_a: String,
    pub rikishi_b: String,
    pub a_favors_b: usize,
    pub b_favors_a: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reciprocity {
    pub total_favor_pairs: usize,
    pub mutual_pairs: usize,
    pub mutual_rate: f64,
    pub top_pairs: Vec<FavorPair>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StarTradingAnalysis {
    pub record_matchup_matrix: Vec<RecordMatchup>,
    pub yearly_trend: Vec<YearlyTrend>,
    pub reciprocity: Reciprocity,
}

/// Record-vs-record outcomes on day 15, seen from both sides. Only full
/// 14-bout records with at least `MATRIX_MIN_BOUTS` meetings are kept.
fn matchup_matrix(finals: &[FinalBout]) -> Vec<RecordMatchup> {
    let mut matrix: BTreeMap<(Record, Record), Count> = BTreeMap::new();
    for fb in finals {
        for side in [Side::East, Side::West] {
            let (me, opp, won) = fb.from_side(side);
            matrix.entry((me, opp)).or_default().add(won);
        }
    }

    let mut rows: Vec<((Record, Record), Count)> = matrix
        .into_iter()
        .filter(|((me, _), c)| c.bouts >= MATRIX_MIN_BOUTS && me.wins + me.losses == FINAL_DAY - 1)
        .collect();
    rows.sort_by(|a, b| b.1.bouts.cmp(&a.1.bouts).then_with(|| a.0.cmp(&b.0)));
    rows.into_iter()
        .take(TOP_MATCHUPS)
        .map(|((me, opp), c)| RecordMatchup {
            wrestler_record: me.label(),
            opponent_record: opp.label(),
            bouts: c.bouts,
            wrestler_wins: c.wins,
            win_rate: pct(c.wins, c.bouts),
        })
        .collect()
}

/// Per year: 7-7 wrestlers against kachikoshi opponents on day 15, next to
/// how often the lower-ranked wrestler wins an ordinary day 1-14 bout.
fn yearly_trend(bouts: &[BoutView], finals: &[FinalBout]) -> Vec<YearlyTrend> {
    let mut even_vs_majority: BTreeMap<u32, Count> = BTreeMap::new();
    for fb in finals {
        for side in [Side::East, Side::West] {
            let (me, opp, won) = fb.from_side(side);
            if me == EVEN && opp.wins >= MAJORITY {
                even_vs_majority.entry(fb.year).or_default().add(won);
            }
        }
    }

    let mut baseline: BTreeMap<u32, Count> = BTreeMap::new();
    let ordinary = bouts.iter().filter(|b| {
        b.is_makuuchi() && b.day < FINAL_DAY && b.result_type == Some(ResultType::Normal)
    });
    for b in ordinary {
        let (Some(year), Some(winner)) = (b.year(), b.winner()) else { continue };
        let (Some(east), Some(west)) = (rank_to_numeric(b.east_rank), rank_to_numeric(b.west_rank)) else {
            continue;
        };
        if east == west {
            continue;
        }
        let lower = if east > west { Side::East } else { Side::West };
        baseline.entry(year).or_default().add(winner == lower);
    }

    let years: BTreeSet<u32> = even_vs_majority.keys().chain(baseline.keys()).copied().collect();
    years
        .into_iter()
        .map(|year| {
            let n = even_vs_majority.get(&year).copied().unwrap_or_default();
            let b = baseline.get(&year).copied().unwrap_or_default();
            YearlyTrend {
                year,
                nanahachi_vs_kachikoshi_bouts: n.bouts,
                nanahachi_vs_kachikoshi_rate: pct_opt(n.wins, n.bouts),
                baseline_bouts: b.bouts,
                baseline_rate: pct_opt(b.wins, b.bouts),
            }
        })
        .collect()
}

/// A "favor" is a day-15 win by a 7-7 wrestler over a kachikoshi opponent.
/// A pair is mutual when the favor was later returned the other way.
fn reciprocity(finals: &[FinalBout], names: &BTreeMap<u32, String>) -> Reciprocity {
    // (winner, loser) -> basho of each favor
    let mut favors: BTreeMap<(u32, u32), Vec<&str>> = BTreeMap::new();
    for fb in finals {
        let (winner, loser, w_rec, l_rec) = match fb.winner {
            Side::East => (fb.east_rid, fb.west_rid, fb.east, fb.west),
            Side::West => (fb.west_rid, fb.east_rid, fb.west, fb.east),
        };
        if w_rec == EVEN && l_rec.wins >= MAJORITY {
            favors.entry((winner, loser)).or_default().push(fb.basho);
        }
    }

    let mutual_pairs = favors
        .iter()
        .filter(|&(&(w, l), given)| favors.get(&(l, w)).is_some_and(|back| returned_later(given, back)))
        .count();

    // Each unordered pair once; `a` is the lower rid.
    let mut top_pairs: Vec<FavorPair> = favors
        .iter()
        .filter(|((a, b), _)| a < b)
        .filter_map(|((a, b), a_to_b)| {
            let b_to_a = favors.get(&(*b, *a))?;
            Some(FavorPair {
                rikishi_a: name_of(names, *a),
                rikishi_b: name_of(names, *b),
                a_favors_b: a_to_b.len(),
                b_favors_a: b_to_a.len(),
                total: a_to_b.len() + b_to_a.len(),
            })
        })
        .collect();
    top_pairs.sort_by(|x, y| y.total.cmp(&x.total));
    top_pairs.truncate(TOP_PAIRS);

    Reciprocity {
        total_favor_pairs: favors.len(),
        mutual_pairs,
        mutual_rate: pct(mutual_pairs, favors.len()),
        top_pairs,
    }
}

fn returned_later(given: &[&str], back: &[&str]) -> bool {
    given.iter().any(|b1| back.iter().any(|b2| b2 > b1))
}

pub fn star_trading_analysis(bouts: &[BoutView], dim: &[Row]) -> StarTradingAnalysis {
    let names = latest_shikona(dim);
    let records = records_entering_final_day(bouts);
    let finals = final_day_bouts(bouts, &records);

    StarTradingAnalysis {
        record_matchup_matrix: matchup_matrix(&finals),
        yearly_trend: yearly_trend(bouts, &finals),
        reciprocity: reciprocity(&finals, &names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::bout;
    use crate::report::views;

    /// Days 1-14 for `rid` against a rotating field: `wins` wins then losses.
    fn fourteen_days(basho: &str, rid: u32, wins: u32) -> Vec<Row> {
        (1..FINAL_DAY)
            .map(|day| {
                let opp = 1000 + rid * 100 + day;
                let side = if day <= wins { "E" } else { "W" };
                bout(basho, day, "Makuuchi", (rid, opp), side, "yorikiri", ("M5e", "M6w"), "normal")
            })
            .collect()
    }

    #[test]
    fn records_skip_final_day_and_playoffs() {
        let mut rows = fourteen_days("202501", 1, 7);
        rows.push(bout("202501", 15, "Makuuchi", (1, 2), "E", "yorikiri", ("M5e", "M6w"), "normal"));
        rows.push(bout("202501", 16, "Makuuchi", (1, 2), "E", "yorikiri", ("M5e", "M6w"), "playoff"));
        let v = views(&rows);
        let rec = records_entering_final_day(&v);
        assert_eq!(rec[&("202501", 1)], EVEN);
    }

    #[test]
    fn even_record_on_final_day() {
        let mut rows = Vec::new();
        // Basho A: 7-7 east beats 8-6 west.
        rows.extend(fourteen_days("202401", 1, 7));
        rows.extend(fourteen_days("202401", 2, 8));
        rows.push(bout("202401", 15, "Makuuchi", (1, 2), "E", "yorikiri", ("M5e", "M6w"), "normal"));
        // Basho B: 7-7 west loses to 6-8 east.
        rows.extend(fourteen_days("202501", 3, 7));
        rows.extend(fourteen_days("202501", 4, 6));
        rows.push(bout("202501", 15, "Makuuchi", (4, 3), "E", "oshidashi", ("M5e", "M6w"), "normal"));
        // Basho B: both 7-7, west wins; counted once from the east.
        rows.extend(fourteen_days("202501", 5, 7));
        rows.extend(fourteen_days("202501", 6, 7));
        rows.push(bout("202501", 15, "Makuuchi", (5, 6), "W", "hatakikomi", ("M5e", "M6w"), "normal"));

        let n = nanahachi_analysis(&views(&rows));
        assert_eq!((n.overall.total_bouts, n.overall.wins), (3, 1));
        assert_eq!(n.overall.win_rate, 33.3);
        assert_eq!((n.both_77.total_bouts, n.both_77.east_wins), (1, 0));

        let labels: Vec<&str> = n.by_opponent_record.iter().map(|o| o.opp_record.as_str()).collect();
        assert_eq!(labels, vec!["6-8", "7-7", "8-6"]);
        let years: Vec<(u32, usize, usize)> = n.by_year.iter().map(|y| (y.year, y.bouts, y.wins)).collect();
        assert_eq!(years, vec![(2024, 1, 1), (2025, 2, 0)]);
    }

    #[test]
    fn favors_returned_later_are_mutual() {
        let mut rows = Vec::new();
        // 2024: rid 1 (7-7) beats rid 2 (8-6).
        rows.extend(fourteen_days("202401", 1, 7));
        rows.extend(fourteen_days("202401", 2, 8));
        rows.push(bout("202401", 15, "Makuuchi", (1, 2), "E", "yorikiri", ("M5e", "M6w"), "normal"));
        // 2025: rid 2 (7-7) beats rid 1 (9-5).
        rows.extend(fourteen_days("202501", 2, 7));
        rows.extend(fourteen_days("202501", 1, 9));
        rows.push(bout("202501", 15, "Makuuchi", (1, 2), "W", "oshidashi", ("M5e", "M6w"), "normal"));

        let s = star_trading_analysis(&views(&rows), &[]);
        let r = &s.reciprocity;
        assert_eq!((r.total_favor_pairs, r.mutual_pairs), (2, 1));
        assert_eq!(r.mutual_rate, 50.0);
        assert_eq!(r.top_pairs.len(), 1);
        let p = &r.top_pairs[0];
        assert_eq!((p.rikishi_a.as_str(), p.rikishi_b.as_str(), p.total), ("1", "2", 2));

        // One 7-7 vs kachikoshi bout per year, both won by the 7-7 side.
        let trend: Vec<(u32, usize, Option<f64>)> = s
            .yearly_trend
            .iter()
            .map(|y| (y.year, y.nanahachi_vs_kachikoshi_bouts, y.nanahachi_vs_kachikoshi_rate))
            .collect();
        assert_eq!(trend, vec![(2024, 1, Some(100.0)), (2025, 1, Some(100.0))]);

        // Too few meetings for the matrix.
        assert!(s.record_matchup_matrix.is_empty());
    }
}

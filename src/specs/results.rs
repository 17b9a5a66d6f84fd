// src/specs/results.rs
//! Scraping *spec* for one day of results (`Results.aspx?b=YYYYMM&d=N`).
//!
//! Page shape (per division):
//! ```text
//! <table class="tk_table">
//!   <tr><td class="tk_kaku" colspan=5>Makuuchi</td></tr>
//!   <tr>
//!     <td class="tk_kekka"><img src="img/hoshi_shiro.gif"></td>   east decision
//!     <td class="tk_east"><font size=1>Y1e</font> <a href="Rikishi.aspx?r=…">…</a></td>
//!     <td class="tk_kim"><font size=1><br></font>yorikiri<br>…</td>
//!     <td class="tk_west">…</td>
//!     <td class="tk_kekka"><img src="img/hoshi_kuro.gif"></td>    west decision
//!   </tr>
//! ```
//!
//! Every 5-cell data row becomes exactly one `BoutRecord`. A row that cannot be
//! read is still emitted, as `unknown`, with the reason in `note`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use super::profile_link;
use crate::config::consts::PLAYOFF_DAY;
use crate::core::html::{attr, compact_text, first, first_line, has_class, text_after_marker};
use crate::model::{BoutMeta, BoutRecord, Division, ResultType, Side};

static TABLE: LazyLock<Selector> = LazyLock::new(|| sel!("table.tk_table"));
static HEADER: LazyLock<Selector> = LazyLock::new(|| sel!("td.tk_kaku"));
static TR: LazyLock<Selector> = LazyLock::new(|| sel!("tr"));
static TD: LazyLock<Selector> = LazyLock::new(|| sel!("td"));
static SMALL: LazyLock<Selector> = LazyLock::new(|| sel!(r#"font[size="1"]"#));
static IMG: LazyLock<Selector> = LazyLock::new(|| sel!("img"));

const HEADER_CLASS: &str = "tk_kaku";

/// Decision icon next to a wrestler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Win,
    Loss,
    FusenWin,
    FusenLoss,
    None,
}

impl Mark {
    fn from_icon(src: &str) -> Mark {
        if src.contains("hoshi_shiro") { Mark::Win }
        else if src.contains("hoshi_kuro") { Mark::Loss }
        else if src.contains("fusensho") { Mark::FusenWin }
        else if src.contains("fusenpai") { Mark::FusenLoss }
        else { Mark::None }
    }

    fn is_win(self) -> bool { matches!(self, Mark::Win | Mark::FusenWin) }
    fn is_fusen(self) -> bool { matches!(self, Mark::FusenWin | Mark::FusenLoss) }
}

/// Per-page counts, logged after every page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub per_division: BTreeMap<Division, usize>,
    pub exceptions: usize,
}

pub fn summarize(records: &[BoutRecord]) -> PageSummary {
    let mut s = PageSummary::default();
    for r in records {
        *s.per_division.entry(r.division).or_insert(0) += 1;
        if r.result_type.is_exception() {
            s.exceptions += 1;
        }
    }
    s
}

/// Parse one results page into bout records, in page order.
pub fn parse_results_page(html: &str, meta: &BoutMeta) -> Vec<BoutRecord> {
    let doc = Html::parse_document(html);
    let mut records = Vec::new();
    let mut source_row_index = 0u32; // page-wide, never resets

    for table in doc.select(&TABLE) {
        let Some(division) = table_division(table) else {
            debug!("Results: skipping table without a known division header");
            continue;
        };

        let mut bout_no = 0u32;
        for tr in table.select(&TR) {
            let cells: Vec<ElementRef> = tr.select(&TD).collect();
            if cells.len() != 5 || has_class(cells[0], HEADER_CLASS) {
                continue;
            }
            source_row_index += 1;
            bout_no += 1;

            let pos = RowPos { division, bout_no, source_row_index };
            let record = match parse_bout_row(&cells, pos, meta) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Failed to parse bout row {source_row_index} in {division}: {e}");
                    failed_row(pos, meta, e)
                }
            };
            debug!(
                "  bout {} #{}: {} vs {} -> {} by {} [{}]",
                division, bout_no, record.east_rid, record.west_rid,
                record.winner_side.map(Side::winner_code).unwrap_or("-"),
                record.kimarite, record.result_type,
            );
            records.push(record);
        }
    }

    let summary = summarize(&records);
    info!(
        "Parsed {} bouts from day {} ({}): {}, exceptions={}",
        records.len(), meta.day, meta.event_id,
        summary.per_division.iter()
            .map(|(d, n)| format!("{d}={n}"))
            .collect::<Vec<_>>()
            .join(", "),
        summary.exceptions,
    );
    records
}

#[derive(Clone, Copy)]
struct RowPos {
    division: Division,
    bout_no: u32,
    source_row_index: u32,
}

/* ---------------- row ---------------- */

fn parse_bout_row(cells: &[ElementRef], pos: RowPos, meta: &BoutMeta) -> Result<BoutRecord, String> {
    let [east_kekka, east_cell, kim_cell, west_cell, west_kekka] = cells else {
        return Err(format!("expected 5 cells, got {}", cells.len()));
    };

    let east_rid = rid_of(*east_cell)?;
    let west_rid = rid_of(*west_cell)?;
    let east_mark = mark_of(*east_kekka);
    let west_mark = mark_of(*west_kekka);
    let technique = kimarite_of(*kim_cell);

    let result_type = classify(east_mark, west_mark, &technique, east_rid, west_rid, meta.day);

    let (winner_side, kimarite) = match result_type {
        ResultType::Kyujo => (None, s!()),
        ResultType::Fusen => (winner_of(east_mark, west_mark), s!("fusen")),
        _ => (winner_of(east_mark, west_mark), technique),
    };

    Ok(BoutRecord {
        event_id: meta.event_id.clone(),
        event_type: meta.event_type,
        basho: meta.basho.clone(),
        day: meta.day,
        division: pos.division,
        bout_no: pos.bout_no,
        east_rid,
        west_rid,
        winner_side,
        kimarite,
        east_rank: rank_of(*east_cell),
        west_rank: rank_of(*west_cell),
        result_type,
        note: s!(),
        source_url: meta.source_url.clone(),
        source_row_index: pos.source_row_index,
        fetched_at: meta.fetched_at.clone(),
    })
}

fn failed_row(pos: RowPos, meta: &BoutMeta, reason: String) -> BoutRecord {
    BoutRecord {
        event_id: meta.event_id.clone(),
        event_type: meta.event_type,
        basho: meta.basho.clone(),
        day: meta.day,
        division: pos.division,
        bout_no: pos.bout_no,
        east_rid: 0,
        west_rid: 0,
        winner_side: None,
        kimarite: s!(),
        east_rank: s!(),
        west_rank: s!(),
        result_type: ResultType::Unknown,
        note: reason,
        source_url: meta.source_url.clone(),
        source_row_index: pos.source_row_index,
        fetched_at: meta.fetched_at.clone(),
    }
}

/// Priority order matters: a walkover with a missing wrestler link is still `fusen`.
pub fn classify(
    east: Mark,
    west: Mark,
    kimarite: &str,
    east_rid: u32,
    west_rid: u32,
    day: u32,
) -> ResultType {
    if east.is_fusen() || west.is_fusen() || kimarite.eq_ignore_ascii_case("fusen") {
        ResultType::Fusen
    } else if east_rid == 0 || west_rid == 0 {
        ResultType::Kyujo
    } else if day == PLAYOFF_DAY {
        ResultType::Playoff
    } else if east == Mark::Win || west == Mark::Win {
        ResultType::Normal
    } else {
        ResultType::Unknown
    }
}

fn winner_of(east: Mark, west: Mark) -> Option<Side> {
    if east.is_win() { Some(Side::East) }
    else if west.is_win() { Some(Side::West) }
    else { None }
}

/* ---------------- cells ---------------- */

fn table_division(table: ElementRef) -> Option<Division> {
    let header = first(table, &HEADER)?;
    Division::find_in(&compact_text(header))
}

/// Missing link → 0 (absent wrestler). A link with an unusable id is a row error.
fn rid_of(cell: ElementRef) -> Result<u32, String> {
    match profile_link(cell) {
        Some((_, digits)) => digits
            .parse::<u32>()
            .map_err(|e| format!("bad rikishi id {digits:?}: {e}")),
        None => Ok(0),
    }
}

fn rank_of(cell: ElementRef) -> String {
    first(cell, &SMALL).map(compact_text).unwrap_or_default()
}

fn kimarite_of(cell: ElementRef) -> String {
    text_after_marker(cell, &SMALL)
        .or_else(|| first_line(cell))
        .unwrap_or_default()
}

fn mark_of(cell: ElementRef) -> Mark {
    first(cell, &IMG)
        .map(|img| Mark::from_icon(attr(img, "src")))
        .unwrap_or(Mark::None)
}

// src/specs/banzuke.rs
//! Scraping *spec* for the rank sheet (`Banzuke.aspx?b=YYYYMM`).
//!
//! One `<table class="banzuke">` per division, identified by its caption.
//! Each body row is `[result, east, rank, west, result]`; either wrestler cell
//! may be an `emptycell` placeholder.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::profile_link;
use crate::core::html::{attr, compact_text, first, has_class};
use crate::model::{Division, ShikonaRecord, Side};

static TABLE: LazyLock<Selector> = LazyLock::new(|| sel!("table.banzuke"));
static CAPTION: LazyLock<Selector> = LazyLock::new(|| sel!("caption"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| sel!("tbody"));
static TR: LazyLock<Selector> = LazyLock::new(|| sel!("tr"));
static TD: LazyLock<Selector> = LazyLock::new(|| sel!("td"));

/// Listings that are not part of the ranked sheet.
const SKIP_CAPTIONS: [&str; 2] = ["Mae-zumo", "Banzuke-gai"];
const EMPTY_CELL_CLASS: &str = "emptycell";

/// "Makuuchi Banzuke" → Makuuchi; otherwise any caption naming a division.
fn caption_division(caption: &str) -> Option<Division> {
    Division::ALL
        .into_iter()
        .find(|d| caption == join!(d.as_str(), " Banzuke"))
        .or_else(|| Division::find_in(caption))
}

pub fn parse_banzuke_page(html: &str, basho: &str, source_url: &str) -> Vec<ShikonaRecord> {
    let doc = Html::parse_document(html);
    let mut records = Vec::new();

    for table in doc.select(&TABLE) {
        let Some(caption) = first(table, &CAPTION).map(compact_text) else {
            continue;
        };
        if SKIP_CAPTIONS.iter().any(|s| caption.contains(s)) {
            debug!("Banzuke: skipping {caption:?}");
            continue;
        }
        let Some(division) = caption_division(&caption) else {
            debug!("Banzuke: skipping unknown table {caption:?}");
            continue;
        };
        let Some(tbody) = first(table, &TBODY) else {
            continue;
        };

        for tr in tbody.select(&TR) {
            let cells: Vec<ElementRef> = tr.select(&TD).collect();
            if cells.len() != 5 {
                continue;
            }
            let rank_text = compact_text(cells[2]);
            let line = RankLine { basho, source_url, division, rank_text: &rank_text };

            records.extend(line.wrestler(cells[1], Side::East));
            records.extend(line.wrestler(cells[3], Side::West));
        }
    }

    info!("Parsed {} rikishi from banzuke ({basho})", records.len());
    records
}

/// Shared context of one banzuke row.
struct RankLine<'a> {
    basho: &'a str,
    source_url: &'a str,
    division: Division,
    rank_text: &'a str,
}

impl RankLine<'_> {
    fn wrestler(&self, cell: ElementRef, side: Side) -> Option<ShikonaRecord> {
        if has_class(cell, EMPTY_CELL_CLASS) {
            return None;
        }
        let (link, digits) = profile_link(cell)?;
        let rid = match digits.parse::<u32>() {
            Ok(rid) => rid,
            Err(e) => {
                debug!("Banzuke: unusable rikishi id {digits:?}: {e}");
                return None;
            }
        };

        // Title reads "<native name>, <romanized name>"; prefer the native one.
        let from_title = attr(link, "title").split(',').next().unwrap_or("").trim();
        let shikona = if from_title.is_empty() { compact_text(link) } else { s!(from_title) };

        let rank = if self.rank_text.is_empty() {
            s!()
        } else {
            join!(self.rank_text, side.rank_suffix())
        };

        Some(ShikonaRecord {
            basho: s!(self.basho),
            rid,
            shikona_at_basho: shikona,
            source_url: s!(self.source_url),
            division: self.division,
            rank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(rid: u32, title: &str, text: &str) -> String {
        format!(r#"<td class="shikona"><a href="Rikishi.aspx?r={rid}" title="{title}">{text}</a></td>"#)
    }

    const EMPTY: &str = r#"<td class="emptycell"></td>"#;

    fn table(caption: &str, rows: &[(String, &str, String)]) -> String {
        let body: String = rows
            .iter()
            .map(|(e, rank, w)| format!(r#"<tr><td class="result"></td>{e}<td class="short_rank">{rank}</td>{w}<td class="result"></td></tr>"#))
            .collect();
        format!(r#"<table class="banzuke"><caption>{caption}</caption><thead><tr><th>x</th></tr></thead><tbody>{body}</tbody></table>"#)
    }

    #[test]
    fn reads_rank_lines_and_sides() {
        let html = format!(
            "<html><body>{}</body></html>",
            table("Makuuchi Banzuke", &[
                (cell(12270, "琴櫻, Kotozakura", "Kotozakura"), "Y", cell(12451, "豊昇龍, Hoshoryu", "Hoshoryu")),
                (cell(11980, "若元春, Wakamotoharu", "Wakamotoharu"), "S", s!(EMPTY)),
            ]),
        );
        let recs = parse_banzuke_page(&html, "202501", "https://example.com/banzuke");
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].rid, 12270);
        assert_eq!(recs[0].shikona_at_basho, "琴櫻");
        assert_eq!(recs[0].rank, "Ye");
        assert_eq!(recs[1].rank, "Yw");
        assert_eq!(recs[2].rank, "Se");
        assert!(recs.iter().all(|r| r.division == Division::Makuuchi));
    }

    #[test]
    fn title_missing_falls_back_to_link_text() {
        let html = table("Juryo Banzuke", &[(cell(7, "", "Tamawashi"), "J1", cell(8, " , x", "Hokutofuji"))]);
        let recs = parse_banzuke_page(&html, "202501", "u");
        assert_eq!(recs[0].shikona_at_basho, "Tamawashi");
        assert_eq!(recs[1].shikona_at_basho, "Hokutofuji");
        assert_eq!(recs[0].rank, "J1e");
    }

    #[test]
    fn empty_rank_text_leaves_rank_empty() {
        let html = table("Jonokuchi", &[(cell(9, "", "A"), "", s!(EMPTY))]);
        let recs = parse_banzuke_page(&html, "202501", "u");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rank, "");
        assert_eq!(recs[0].division, Division::Jonokuchi);
    }

    #[test]
    fn unranked_listings_are_skipped() {
        let html = format!(
            "{}{}{}",
            table("Mae-zumo", &[(cell(1, "", "A"), "Mz", cell(2, "", "B"))]),
            table("Banzuke-gai", &[(cell(3, "", "C"), "", cell(4, "", "D"))]),
            table("Something else", &[(cell(5, "", "E"), "X", cell(6, "", "F"))]),
        );
        assert!(parse_banzuke_page(&html, "202501", "u").is_empty());
    }

    #[test]
    fn caption_vocabulary() {
        assert_eq!(caption_division("Sandanme Banzuke"), Some(Division::Sandanme));
        assert_eq!(caption_division("Banzuke Makushita (East)"), Some(Division::Makushita));
        assert_eq!(caption_division("Mystery"), None);
    }
}

// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific extraction rules for SumoDB. Each spec reads exactly one page
//! type and knows *where the ground truth lives in the HTML*:
//!
//! - `results` – `Results.aspx?b=YYYYMM&d=N`: one day of bouts, all divisions.
//! - `banzuke` – `Banzuke.aspx?b=YYYYMM`: the rank sheet.
//! - `playoff` – sniffing the final day's page for a link to day 16.
//!
//! ## What lives here
//! - **Pure HTML → record functions.** Input is an already fetched string plus
//!   metadata; output is typed records from `crate::model`.
//! - **Classification rules** for awkward rows (walkover, absence, playoff).
//!
//! ## What does **not** live here
//! - Fetching, caching and pacing (`core::net`).
//! - Merging into the CSV tables (`store`).
//! - Deciding which pages to read (`runner`).
//!
//! ## Conventions
//! - Rules are tied to SumoDB's current markup (`tk_table`, `banzuke`,
//!   `font size=1` annotations). They are expected to break loudly in logs, not
//!   silently in data, when the site changes.
//! - A page never fails as a whole because of one row.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::core::html::attr;

pub mod banzuke;
pub mod playoff;
pub mod results;

static RID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rikishi\.aspx\?r=(\d+)").expect("rikishi id pattern"));

static LINK: LazyLock<Selector> = LazyLock::new(|| sel!("a[href]"));

/// First profile link inside `cell`, with the captured id digits.
pub(crate) fn profile_link<'a>(cell: ElementRef<'a>) -> Option<(ElementRef<'a>, &'a str)> {
    cell.select(&LINK).find_map(|a| {
        let digits = RID_RE.captures(attr(a, "href"))?.get(1)?.as_str();
        Some((a, digits))
    })
}

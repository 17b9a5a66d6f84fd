// src/specs/playoff.rs
//! Does the final day's page link to a day-16 playoff?
//!
//! Heuristic only. A miss means the playoff is not ingested; it never errors.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::info;

use crate::config::consts::PLAYOFF_DAY;
use crate::core::html::{attr, compact_text};

static LINK: LazyLock<Selector> = LazyLock::new(|| sel!("a[href]"));

pub fn detect_playoff(html: &str, basho: &str) -> bool {
    let doc = Html::parse_document(html);
    let basho_param = join!("b=", basho);
    let day_param = format!("d={PLAYOFF_DAY}");

    let found = doc.select(&LINK).any(|a| {
        let href = attr(a, "href");
        href.contains(&basho_param)
            && href.contains(&day_param)
            && compact_text(a).to_lowercase().contains("playoff")
    });
    if found {
        info!("Playoff detected for basho {basho}");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_playoff_link() {
        let html = r#"<div class="daytable"><a href="Results.aspx?b=202501&amp;d=15">Day 15</a>
            <a href="Results.aspx?b=202501&amp;d=16">Playoffs</a></div>"#;
        assert!(detect_playoff(html, "202501"));
    }

    #[test]
    fn other_basho_or_text_does_not_count() {
        let html = r#"<a href="Results.aspx?b=202411&d=16">Playoffs</a>
            <a href="Results.aspx?b=202501&d=16">Day 16</a>"#;
        assert!(!detect_playoff(html, "202501"));
        assert!(!detect_playoff("", "202501"));
    }
}

// src/core/html.rs
//
// Thin capability layer over `scraper`: what the page specs are allowed to ask
// of a document. Element lookup by selector, attributes, flat text, and the
// "text right after a marker" walk the results page needs.

use scraper::{ElementRef, Node, Selector};

use super::sanitize::{first_nonempty_line, normalize_ws};

/// Text nodes trimmed and glued without separator: `M<br>3` reads `M3`.
pub fn compact_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// Text nodes joined by newlines, each trimmed. Mirrors how a human reads a
/// cell that uses `<br>` as a line separator.
pub fn lines_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First element under `el` matching `sel`.
pub fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> &'a str {
    el.value().attr(name).unwrap_or("")
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Starting after the first `marker` inside `el`, return the first non-empty
/// text node among the marker's following siblings. `<br>` siblings are
/// skipped; any other element ends the walk.
pub fn text_after_marker(el: ElementRef<'_>, marker: &Selector) -> Option<String> {
    let m = first(el, marker)?;
    for sib in m.next_siblings() {
        match sib.value() {
            Node::Text(t) => {
                let t = t.trim();
                if !t.is_empty() {
                    return Some(normalize_ws(t));
                }
            }
            Node::Element(e) if e.name().eq_ignore_ascii_case("br") => continue,
            Node::Element(_) => break,
            _ => continue, // comments etc.
        }
    }
    None
}

/// First non-empty line of the element's text.
pub fn first_line(el: ElementRef<'_>) -> Option<String> {
    first_nonempty_line(&lines_of(el)).map(normalize_ws)
}

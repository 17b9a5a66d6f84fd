// src/csv.rs
use std::mem::take;

pub const SEP: char = ',';

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). Blank lines are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == SEP && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Append a single row, LF-terminated, quoting only where needed.
pub fn push_row<S: AsRef<str>>(buf: &mut String, row: &[S]) {
    for (i, cell) in row.iter().enumerate() {
        let cell = cell.as_ref();
        if i > 0 { buf.push(SEP); }
        if needs_quotes(cell) {
            buf.push('"');
            buf.push_str(&cell.replace('"', "\"\""));
            buf.push('"');
        } else {
            buf.push_str(cell);
        }
    }
    buf.push('\n');
}

/// Header line + rows as one string.
pub fn rows_to_string<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let mut buf = s!();
    push_row(&mut buf, headers);
    for r in rows {
        push_row(&mut buf, r);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_only_when_needed() {
        let out = rows_to_string(&["a", "b"], &[vec![s!("x,y"), s!("plain")], vec![s!("say \"hi\""), s!("")]]);
        assert_eq!(out, "a,b\n\"x,y\",plain\n\"say \"\"hi\"\"\",\n");
        assert!(!out.contains('\r'));
    }

    #[test]
    fn push_row_appends_to_buffer() {
        let mut buf = s!("h\n");
        push_row(&mut buf, &["a\rb", "c"]);
        assert_eq!(buf, "h\n\"a\rb\",c\n");
    }

    #[test]
    fn parses_quotes_crlf_and_blank_lines() {
        let rows = parse_rows("a,b\r\n\"x,\"\"y\"\"\",2\r\n\r\nlast,\n");
        assert_eq!(rows, vec![
            vec![s!("a"), s!("b")],
            vec![s!("x,\"y\""), s!("2")],
            vec![s!("last"), s!("")],
        ]);
    }

    #[test]
    fn embedded_newline_survives() {
        let text = rows_to_string(&["note"], &[vec![s!("line1\nline2")]]);
        let rows = parse_rows(&text);
        assert_eq!(rows[1], vec![s!("line1\nline2")]);
    }
}

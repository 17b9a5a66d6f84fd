// src/store.rs
//
// The two durable tables and their merge rules.
//
// Every write is read-whole / transform-in-memory / write-whole. Rows are held
// as string-keyed maps so whatever is already on disk passes through untouched
// unless a merge replaces it.

use std::{cmp::Ordering, collections::HashMap, path::Path};

use tracing::info;

use crate::csv::{parse_rows, rows_to_string};
use crate::error::{Error, Result};
use crate::file::{read_if_exists, write_whole};
use crate::model::{BoutRecord, ShikonaRecord};

pub type Row = HashMap<String, String>;

/// Columns compared as integers when sorting (unparseable → 0).
pub const NUMERIC_COLUMNS: [&str; 6] = ["day", "bout_no", "rid", "source_row_index", "east_rid", "west_rid"];

/// Shape and merge rules of one table.
#[derive(Clone, Copy, Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub key: &'static [&'static str],
    pub sort: &'static [&'static str],
    /// Columns compared as integers when sorting.
    pub numeric: &'static [&'static str],
    /// Column a force-replace clears by value.
    pub scope: &'static str,
}

pub const BOUTS: TableSpec = TableSpec {
    name: "fact_bout_daily",
    columns: &[
        "event_id", "event_type", "is_regular", "basho", "day", "division",
        "bout_no", "east_rid", "west_rid", "winner_side", "kimarite",
        "east_rank", "west_rank", "result_type", "note", "source_url",
        "source_row_index", "fetched_at",
    ],
    key: &["event_id", "day", "division", "bout_no"],
    sort: &["event_id", "day", "division", "bout_no"],
    numeric: &NUMERIC_COLUMNS,
    scope: "event_id",
};

pub const SHIKONA: TableSpec = TableSpec {
    name: "dim_shikona_by_basho",
    columns: &["basho", "rid", "shikona_at_basho", "source_url", "division", "rank"],
    key: &["basho", "rid"],
    sort: &["basho", "rid"],
    numeric: &NUMERIC_COLUMNS,
    scope: "basho",
};

/// What a merge did, for logs and progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub incoming: usize,
    pub removed: usize,
    pub total: usize,
}

pub fn field<'a>(row: &'a Row, col: &str) -> &'a str {
    row.get(col).map(String::as_str).unwrap_or("")
}

impl TableSpec {
    /// Zip a value list (in column order) into a row.
    pub fn row_from(&self, values: Vec<String>) -> Row {
        self.columns.iter().map(|c| s!(*c)).zip(values).collect()
    }

    fn key_of(&self, row: &Row) -> Vec<String> {
        self.key.iter().map(|k| s!(field(row, k))).collect()
    }

    fn project(&self, row: &Row) -> Vec<String> {
        self.columns.iter().map(|c| s!(field(row, c))).collect()
    }
}

/* ---------------- Sort ---------------- */

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortCell<'a> {
    Num(i64),
    Text(&'a str),
}

fn sort_cell<'a>(spec: &TableSpec, row: &'a Row, col: &str) -> SortCell<'a> {
    let v = field(row, col);
    if spec.numeric.contains(&col) {
        SortCell::Num(v.trim().parse().unwrap_or(0))
    } else {
        SortCell::Text(v)
    }
}

fn compare(spec: &TableSpec, a: &Row, b: &Row) -> Ordering {
    spec.sort
        .iter()
        .map(|col| sort_cell(spec, a, col).cmp(&sort_cell(spec, b, col)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable sort by the table's sort columns.
pub fn sort_rows(spec: &TableSpec, rows: &mut [Row]) {
    rows.sort_by(|a, b| compare(spec, a, b));
}

/* ---------------- Read / write ---------------- */

/// Header plus rows keyed by it. Missing or empty file → no header, no rows.
fn read_with_header(path: &Path) -> Result<(Vec<String>, Vec<Row>)> {
    let Some(text) = read_if_exists(path)? else {
        return Ok((Vec::new(), Vec::new()));
    };
    let mut rows = parse_rows(&text).into_iter();
    let Some(headers) = rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let rows = rows
        .map(|r| headers.iter().cloned().zip(r).collect::<Row>())
        .collect();
    Ok((headers, rows))
}

/// Rows keyed by the file's own header. Missing file → empty table.
pub fn read_table(path: &Path) -> Result<Vec<Row>> {
    Ok(read_with_header(path)?.1)
}

/// Existing rows of a table about to be merged into. `required` are the
/// columns the merge mode reads back; a non-empty file missing one is refused.
fn read_for_merge(path: &Path, spec: &TableSpec, required: &[&str]) -> Result<Vec<Row>> {
    let (headers, rows) = read_with_header(path)?;
    if !rows.is_empty() {
        if let Some(col) = required.iter().find(|c| !headers.iter().any(|h| h == *c)) {
            return Err(Error::Parse(format!(
                "{} ({}): header has no {col:?} column",
                spec.name, path.display(),
            )));
        }
    }
    Ok(rows)
}

/// Sort and write `rows` as the whole table (header included).
pub fn write_table(path: &Path, spec: &TableSpec, mut rows: Vec<Row>) -> Result<usize> {
    sort_rows(spec, &mut rows);
    let out: Vec<Vec<String>> = rows.iter().map(|r| spec.project(r)).collect();
    write_whole(path, &rows_to_string(spec.columns, &out))?;
    Ok(out.len())
}

/* ---------------- Merge modes ---------------- */

/// Insert or overwrite by key, then rewrite the whole table sorted.
pub fn upsert(path: &Path, spec: &TableSpec, incoming: Vec<Row>) -> Result<MergeStats> {
    // Without every key column all rows would collapse onto one key.
    let existing = read_for_merge(path, spec, spec.key)?;
    let n_in = incoming.len();

    let mut rows: Vec<Row> = Vec::with_capacity(existing.len() + n_in);
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    for row in existing.into_iter().chain(incoming) {
        let key = spec.key_of(&row);
        match index.get(&key) {
            Some(&i) => rows[i] = row,
            None => {
                index.insert(key, rows.len());
                rows.push(row);
            }
        }
    }

    let total = write_table(path, spec, rows)?;
    info!("Upserted {n_in} records into {} -> {total} total rows ({})", spec.name, path.display());
    Ok(MergeStats { incoming: n_in, removed: 0, total })
}

/// Drop every row whose scope column equals `scope_value`, append `incoming`,
/// rewrite sorted. Rows of other scopes are never touched.
pub fn force_replace(
    path: &Path,
    spec: &TableSpec,
    incoming: Vec<Row>,
    scope_value: &str,
) -> Result<MergeStats> {
    let existing = read_for_merge(path, spec, &[spec.scope])?;
    let before = existing.len();
    let n_in = incoming.len();

    let mut rows: Vec<Row> = existing
        .into_iter()
        .filter(|r| field(r, spec.scope) != scope_value)
        .collect();
    let removed = before - rows.len();
    rows.extend(incoming);

    let total = write_table(path, spec, rows)?;
    info!(
        "Force replaced {}={scope_value} in {}: removed {removed}, added {n_in} -> {total} total rows ({})",
        spec.scope, spec.name, path.display(),
    );
    Ok(MergeStats { incoming: n_in, removed, total })
}

/* ---------------- Typed entry points ---------------- */

pub fn bout_rows(records: &[BoutRecord]) -> Vec<Row> {
    records.iter().map(|r| BOUTS.row_from(r.to_row())).collect()
}

pub fn shikona_rows(records: &[ShikonaRecord]) -> Vec<Row> {
    records.iter().map(|r| SHIKONA.row_from(r.to_row())).collect()
}

pub fn update_bouts(records: &[BoutRecord], path: &Path, force: bool, event_id: &str) -> Result<MergeStats> {
    let rows = bout_rows(records);
    if force { force_replace(path, &BOUTS, rows, event_id) } else { upsert(path, &BOUTS, rows) }
}

pub fn update_shikona(records: &[ShikonaRecord], path: &Path, force: bool, basho: &str) -> Result<MergeStats> {
    let rows = shikona_rows(records);
    if force { force_replace(path, &SHIKONA, rows, basho) } else { upsert(path, &SHIKONA, rows) }
}

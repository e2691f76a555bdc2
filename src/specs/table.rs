// src/specs/table.rs

use tracing::{debug, info};

use crate::config::consts::{COL_BOROUGH, UNASSIGNED};
use crate::core::Doc;
use crate::data::Table;
use crate::error::{Error, Result, Stage};
use crate::source::Fetch;

/// Fetch `url` and return its table number `index`, header row as column names.
pub fn fetch(fetcher: &dyn Fetch, url: &str, index: usize) -> Result<Table> {
    let html = fetcher.fetch_text(Stage::TableFetch, url)?;
    let table = extract(&html, index)?;
    info!(url, index, rows = table.len(), columns = ?table.headers, "table fetched");
    Ok(table)
}

/// Table number `index` of `html`.
pub fn extract(html: &str, index: usize) -> Result<Table> {
    let mut tables = parse_tables(html);
    if index >= tables.len() {
        return Err(Error::parse(
            Stage::TableFetch,
            format!("no table at index {index} ({} found)", tables.len()),
        ));
    }
    Ok(tables.swap_remove(index))
}

/// Every top-level `<table>` in document order. The first `<tr>` of each
/// becomes its headers; tables without rows come back empty.
pub fn parse_tables(html: &str) -> Vec<Table> {
    let doc = Doc::new(html);
    doc.blocks("table", 0, html.len())
        .into_iter()
        .map(|t| {
            let mut rows = read_rows(&doc, t.inner_start, t.inner_end);
            let headers = if rows.is_empty() { Vec::new() } else { rows.remove(0) };
            debug!(columns = headers.len(), rows = rows.len(), "parsed table");
            Table::new(headers, rows)
        })
        .collect()
}

/// Rows of one table body. Rows of nested tables are skipped.
fn read_rows(doc: &Doc, from: usize, to: usize) -> Vec<Vec<String>> {
    let nested = doc.blocks("table", from, to);
    let inside_nested = |pos: usize| nested.iter().any(|n| pos >= n.start && pos < n.end);

    let mut rows = Vec::new();
    let mut pos = from;
    while let Some(tr) = doc.next_block("tr", pos, to) {
        pos = tr.end;
        if inside_nested(tr.start) {
            continue;
        }
        let cells = read_cells(doc, tr.inner_start, tr.inner_end);
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    rows
}

/// `<th>` and `<td>` cells alike. A cell runs to its close tag, or to the next
/// cell if the close tag was omitted. Markup of nested tables stays in the cell.
fn read_cells(doc: &Doc, from: usize, to: usize) -> Vec<String> {
    let nested = doc.blocks("table", from, to);
    // first hit of `find` at or after `pos` that is not inside a nested table
    let outside = |find: &dyn Fn(usize) -> Option<usize>, mut pos: usize| -> Option<usize> {
        loop {
            let hit = find(pos).filter(|&p| p < to)?;
            match nested.iter().find(|n| hit >= n.start && hit < n.end) {
                Some(n) => pos = n.end,
                None => return Some(hit),
            }
        }
    };
    let next_cell = |pos: usize| -> Option<usize> {
        let td = outside(&|p| doc.find_open("td", p), pos);
        let th = outside(&|p| doc.find_open("th", p), pos);
        match (td, th) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    };

    let mut cells = Vec::new();
    let mut pos = from;
    while let Some(start) = next_cell(pos) {
        let Some(inner) = doc.open_tag_end(start).filter(|&e| e <= to) else { break };
        let following = next_cell(inner).unwrap_or(to);
        let close = [
            outside(&|p| doc.find_close("td", p), inner),
            outside(&|p| doc.find_close("th", p), inner),
        ]
        .into_iter()
        .flatten()
        .filter(|&c| c <= following)
        .min()
        .unwrap_or(following);
        cells.push(doc.text(inner, close));
        pos = close;
    }
    cells
}

/// Drop every row whose `Borough` cell is exactly `"Not assigned"`.
pub fn drop_unassigned(table: Table) -> Result<Table> {
    let col = table.column(COL_BOROUGH).ok_or_else(|| {
        Error::parse(
            Stage::TableFetch,
            format!("column {COL_BOROUGH:?} not found in {:?}", table.headers),
        )
    })?;
    let before = table.len();
    let Table { headers, rows } = table;
    let rows: Vec<_> = rows
        .into_iter()
        .filter(|r| Table::cell(r, col) != UNASSIGNED)
        .collect();
    info!(dropped = before - rows.len(), "The number of rows in the table is {}", rows.len());
    Ok(Table::new(headers, rows))
}

// src/specs/geo.rs

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::data::Table;
use crate::error::{Error, Result, Stage};
use crate::source::Fetch;

/// Fetch the geo lookup CSV (`Postal Code, Latitude, Longitude`).
pub fn fetch(fetcher: &dyn Fetch, url: &str) -> Result<Table> {
    let text = fetcher.fetch_text(Stage::GeoJoin, url)?;
    let table = parse_csv(&text)?;
    info!(url, rows = table.len(), columns = ?table.headers, "geo table fetched");
    Ok(table)
}

/// Header row + records. Fields are trimmed; ragged rows are an error.
pub fn parse_csv(text: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| Error::parse(Stage::GeoJoin, e))?
        .iter()
        .map(|h| s!(h.trim_start_matches('\u{feff}')))
        .collect();

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| Error::parse(Stage::GeoJoin, e))?;
        rows.push(rec.iter().map(String::from).collect());
    }
    Ok(Table::new(headers, rows))
}

/// Empty cell → `None`; anything else must be a finite number.
pub fn parse_coordinate(cell: &str, column: &str, postal_code: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(Error::parse(
            Stage::GeoJoin,
            format!("{column} {cell:?} for {postal_code} is not a number"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_rows() {
        let t = parse_csv("Postal Code,Latitude,Longitude\nM1B,43.8066863,-79.1943534\nM5A, 43.6542599 ,-79.3606359\n").unwrap();
        assert_eq!(t.headers, vec!["Postal Code", "Latitude", "Longitude"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["M5A", "43.6542599", "-79.3606359"]);
    }

    #[test]
    fn byte_order_mark_is_not_part_of_the_header() {
        let t = parse_csv("\u{feff}Postal Code,Latitude,Longitude\n").unwrap();
        assert_eq!(t.column("Postal Code"), Some(0));
        assert!(t.is_empty());
    }

    #[test]
    fn ragged_rows_fail_to_parse() {
        let err = parse_csv("Postal Code,Latitude,Longitude\nM1B,43.8\n").unwrap_err();
        assert!(matches!(err, Error::Parse { stage: Stage::GeoJoin, .. }));
    }

    #[test]
    fn coordinates() {
        assert_eq!(parse_coordinate("43.65", "Latitude", "M5A").unwrap(), Some(43.65));
        assert_eq!(parse_coordinate("", "Latitude", "M5A").unwrap(), None);
        assert!(parse_coordinate("north", "Latitude", "M5A").is_err());
        assert!(parse_coordinate("NaN", "Latitude", "M5A").is_err());
    }
}

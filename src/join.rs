// src/join.rs
//! Keyed outer join of the postal-code table with the geo lookup table.
//!
//! Output order is left rows in source order, then right-only rows in right
//! order (no sorting). Left rows without a geo match keep null coordinates;
//! geo rows without a left match come through with null borough/neighborhood.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::consts::{
    COL_BOROUGH, COL_LATITUDE, COL_LONGITUDE, NEIGHBORHOOD_ALIASES, POSTAL_CODE_ALIASES,
};
use crate::data::{Record, RecordSet, Table};
use crate::error::{Error, Result, Stage};
use crate::specs::geo::parse_coordinate;

/// Match counts of one join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub matched: usize,
    pub left_only: usize,
    pub right_only: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Joined {
    pub records: RecordSet,
    pub stats: JoinStats,
}

/// Outer join of `left` (postal-code table) and `right` (geo table) on the
/// postal-code column of each.
pub fn outer_join(left: &Table, right: &Table) -> Result<Joined> {
    let lkey = key_column(left, "table")?;
    let rkey = key_column(right, "geo table")?;
    let borough = left.column(COL_BOROUGH);
    let neighborhood = left.column_any(NEIGHBORHOOD_ALIASES);
    let lat = value_column(right, COL_LATITUDE)?;
    let lng = value_column(right, COL_LONGITUDE)?;

    unique_keys(left, lkey, "table")?;
    let index = unique_keys(right, rkey, "geo table")?;

    let mut stats = JoinStats::default();
    let mut used = vec![false; right.len()];
    let mut records = Vec::with_capacity(left.len() + right.len());

    for row in &left.rows {
        let code = Table::cell(row, lkey);
        let (latitude, longitude) = match index.get(code) {
            Some(&i) => {
                used[i] = true;
                stats.matched += 1;
                coordinates(&right.rows[i], lat, lng, code)?
            }
            None => {
                stats.left_only += 1;
                (None, None)
            }
        };
        records.push(Record {
            postal_code: s!(code),
            borough: borough.map(|c| s!(Table::cell(row, c))),
            neighborhood: neighborhood.map(|c| s!(Table::cell(row, c))),
            latitude,
            longitude,
        });
    }

    for (row, _) in right.rows.iter().zip(&used).filter(|(_, u)| !**u) {
        let code = Table::cell(row, rkey);
        let (latitude, longitude) = coordinates(row, lat, lng, code)?;
        stats.right_only += 1;
        records.push(Record {
            postal_code: s!(code),
            borough: None,
            neighborhood: None,
            latitude,
            longitude,
        });
    }

    if stats.left_only > 0 {
        warn!(count = stats.left_only, "postal codes without coordinates");
    }
    info!(
        matched = stats.matched,
        left_only = stats.left_only,
        right_only = stats.right_only,
        total = records.len(),
        "joined"
    );
    Ok(Joined { records: RecordSet::new(records), stats })
}

fn key_column(table: &Table, which: &str) -> Result<usize> {
    table.column_any(POSTAL_CODE_ALIASES).ok_or_else(|| {
        Error::join(format!(
            "{which} has no postal-code column (looked for {POSTAL_CODE_ALIASES:?}, found {:?})",
            table.headers
        ))
    })
}

fn value_column(table: &Table, name: &str) -> Result<usize> {
    table.column(name).ok_or_else(|| {
        Error::parse(Stage::GeoJoin, format!("geo table has no {name:?} column (found {:?})", table.headers))
    })
}

/// key → row index; a repeated key is an error.
fn unique_keys<'a>(table: &'a Table, col: usize, which: &str) -> Result<HashMap<&'a str, usize>> {
    let mut index = HashMap::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        let code = Table::cell(row, col);
        if index.insert(code, i).is_some() {
            return Err(Error::join(format!("{which} repeats postal code {code:?}")));
        }
    }
    Ok(index)
}

fn coordinates(row: &[String], lat: usize, lng: usize, code: &str) -> Result<(Option<f64>, Option<f64>)> {
    Ok((
        parse_coordinate(Table::cell(row, lat), COL_LATITUDE, code)?,
        parse_coordinate(Table::cell(row, lng), COL_LONGITUDE, code)?,
    ))
}

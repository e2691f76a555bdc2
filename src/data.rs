// src/data.rs
//
// Typed rows of the pipeline.
//
// - Table:        untyped headers + rows straight out of a page or CSV.
// - Record:       one joined row; coordinates are optional.
// - RecordSet:    ordered records, source order preserved.
// - BoroughGroup: records sharing one exact borough name.

use serde::{Deserialize, Serialize};

/// Headers + string cells, as scraped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first header equal to `name` (exact match).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first header matching any of `names`, in order of preference.
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n))
    }

    /// Cell at (`row`, `col`); short rows read as empty.
    pub fn cell(row: &[String], col: usize) -> &str {
        row.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }
}

/// One row of the joined dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub postal_code: String,
    pub borough: Option<String>,
    pub neighborhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Record {
    /// Both coordinates, or nothing.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }

    /// Popup text: `"{neighborhood}, {borough}"`.
    pub fn label(&self) -> String {
        let n = self.neighborhood.as_deref().unwrap_or("");
        let b = self.borough.as_deref().unwrap_or("");
        join!(n, ", ", b)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self { Self { records } }

    pub fn records(&self) -> &[Record] { &self.records }
    pub fn iter(&self) -> std::slice::Iter<'_, Record> { self.records.iter() }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn get(&self, postal_code: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.postal_code == postal_code)
    }

    /// Keep the records matching `pred`, in order.
    pub fn filtered<F: Fn(&Record) -> bool>(&self, pred: F) -> RecordSet {
        RecordSet::new(self.records.iter().filter(|r| pred(r)).cloned().collect())
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        RecordSet::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;
    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}

/// Records whose borough equals `name` exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct BoroughGroup {
    pub name: String,
    pub records: RecordSet,
}

impl BoroughGroup {
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

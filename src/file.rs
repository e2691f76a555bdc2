// src/file.rs

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::config::consts::{COL_BOROUGH, COL_LATITUDE, COL_LONGITUDE, COL_NEIGHBORHOOD, COL_POSTAL_CODE};
use crate::core::sanitize::sanitize_file_stem;
use crate::data::{BoroughGroup, RecordSet};
use crate::error::{Error, Result};
use crate::render::RenderedMap;

/// Write the map document to `path`, creating parent directories.
pub fn write_map(path: &Path, map: &RenderedMap) -> Result<PathBuf> {
    ensure_parent(path)?;
    fs::write(path, &map.html)?;
    info!(path = %path.display(), markers = map.marker_count(), "wrote map");
    Ok(path.to_path_buf())
}

/// Records as CSV with a header row; null fields are empty cells.
pub fn write_records_csv(path: &Path, records: &RecordSet) -> Result<PathBuf> {
    ensure_parent(path)?;
    let mut w = csv::Writer::from_path(path)?;
    w.write_record([COL_POSTAL_CODE, COL_BOROUGH, COL_NEIGHBORHOOD, COL_LATITUDE, COL_LONGITUDE])?;
    for r in records {
        let lat = r.latitude.map(|v| v.to_string()).unwrap_or_default();
        let lng = r.longitude.map(|v| v.to_string()).unwrap_or_default();
        w.write_record([
            r.postal_code.as_str(),
            r.borough.as_deref().unwrap_or(""),
            r.neighborhood.as_deref().unwrap_or(""),
            lat.as_str(),
            lng.as_str(),
        ])?;
    }
    w.flush()?;
    info!(path = %path.display(), rows = records.len(), "wrote csv");
    Ok(path.to_path_buf())
}

/// One CSV per group into `dir`, named after the borough.
pub fn write_groups_csv(dir: &Path, groups: &[BoroughGroup]) -> Result<Vec<PathBuf>> {
    ensure_directory(dir)?;
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(groups.len());
    for (i, g) in groups.iter().enumerate() {
        let stem = sanitize_file_stem(&g.name, &format!("group_{i}"));
        let path = resolve_filename(dir, &stem, &mut seen, "csv");
        written.push(write_records_csv(&path, &g.records)?);
    }
    Ok(written)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Config(format!("path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Duplicate handling **only within this run**:
/// `<stem>.ext`, then `<stem> (2).ext`, `<stem> (3).ext`, …
pub fn resolve_filename(
    dir: &Path,
    stem: &str,
    seen_names: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let count = seen_names.entry(s!(stem)).or_insert(0);
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };
    *count += 1;
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn rec(pc: &str, borough: Option<&str>, at: Option<(f64, f64)>) -> Record {
        Record {
            postal_code: s!(pc),
            borough: borough.map(String::from),
            neighborhood: Some(s!("Regent Park, Harbourfront")),
            latitude: at.map(|a| a.0),
            longitude: at.map(|a| a.1),
        }
    }

    #[test]
    fn csv_quotes_commas_and_blanks_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/joined.csv");
        let set = RecordSet::new(vec![
            rec("M5A", Some("Downtown Toronto"), Some((43.6548, -79.3628))),
            rec("M1B", None, None),
        ]);
        write_records_csv(&path, &set).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Postal Code,Borough,Neighborhood,Latitude,Longitude");
        assert_eq!(lines[1], r#"M5A,Downtown Toronto,"Regent Park, Harbourfront",43.6548,-79.3628"#);
        assert_eq!(lines[2], r#"M1B,,"Regent Park, Harbourfront",,"#);
    }

    #[test]
    fn group_files_are_named_after_boroughs() {
        let dir = tempfile::tempdir().unwrap();
        let g = |name: &str| BoroughGroup { name: s!(name), records: RecordSet::default() };
        let written = write_groups_csv(dir.path(), &[g("Downtown Toronto"), g("Downtown-Toronto"), g("Downtown Toronto!")]).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Downtown_Toronto.csv", "Downtown-Toronto.csv", "Downtown_Toronto (2).csv"]);
    }

    #[test]
    fn a_file_in_the_way_of_the_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("out");
        fs::write(&blocker, "x").unwrap();
        assert!(ensure_directory(&blocker).is_err());
    }
}

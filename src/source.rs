// src/source.rs
use std::fs;

use crate::core::net;
use crate::error::{Error, Result, Stage};

/// Where source text comes from. The pipeline only ever asks for text;
/// tests swap in canned documents.
pub trait Fetch: Sync {
    fn fetch_text(&self, stage: Stage, location: &str) -> Result<String>;
}

/// `http://` / `https://` go over the network, anything else is a local path
/// (`file://` prefix optional).
#[derive(Clone, Copy, Debug, Default)]
pub struct Fetcher;

impl Fetch for Fetcher {
    fn fetch_text(&self, stage: Stage, location: &str) -> Result<String> {
        if is_remote(location) {
            return net::http_get(stage, location);
        }
        let path = location.strip_prefix("file://").unwrap_or(location);
        fs::read_to_string(path).map_err(|e| Error::fetch(stage, location, e))
    }
}

pub fn is_remote(location: &str) -> bool {
    let lc = location.get(..8).unwrap_or(location).to_ascii_lowercase();
    lc.starts_with("http://") || lc.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_decides_transport() {
        assert!(is_remote("http://cocl.us/Geospatial_data"));
        assert!(is_remote("HTTPS://en.wikipedia.org/wiki/X"));
        assert!(!is_remote("data/geo.csv"));
        assert!(!is_remote("file:///tmp/geo.csv"));
    }

    #[test]
    fn local_files_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo.csv");
        fs::write(&path, "Postal Code,Latitude,Longitude\n").unwrap();

        let text = Fetcher.fetch_text(Stage::GeoJoin, path.to_str().unwrap()).unwrap();
        assert!(text.starts_with("Postal Code"));

        let url = join!("file://", path.to_str().unwrap());
        assert!(Fetcher.fetch_text(Stage::GeoJoin, &url).is_ok());
    }

    #[test]
    fn missing_file_is_a_fetch_error_for_the_calling_stage() {
        let err = Fetcher.fetch_text(Stage::TableFetch, "/nonexistent/page.html").unwrap_err();
        assert!(matches!(err, Error::Fetch { stage: Stage::TableFetch, .. }));
    }
}

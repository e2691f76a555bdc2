// src/config/options.rs
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::data::Coordinate;
use crate::error::{Error, Result};

/// Everything a run needs. Defaults reproduce the Toronto run; a TOML file
/// and then CLI flags override field by field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
    pub table_url: String,
    pub table_index: usize,
    pub geo_url: String,

    pub filter: String,
    pub groups: Vec<GroupSpec>,

    pub address: String,
    /// Skip the geocoding service and centre here.
    pub center: Option<Coordinate>,
    pub nominatim_url: String,

    pub flat_zoom: u8,
    pub grouped_zoom: u8,
    pub flat_style: MarkerStyle,

    pub out_dir: PathBuf,
    pub export_csv: bool,
    pub parallel_fetch: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            table_url: s!(TABLE_URL),
            table_index: TABLE_INDEX,
            geo_url: s!(GEO_URL),
            filter: s!(BOROUGH_FILTER),
            groups: DEFAULT_GROUPS
                .iter()
                .map(|(name, color)| GroupSpec::new(name, color))
                .collect(),
            address: s!(CENTER_ADDRESS),
            center: None,
            nominatim_url: s!(NOMINATIM_URL),
            flat_zoom: FLAT_ZOOM,
            grouped_zoom: GROUPED_ZOOM,
            flat_style: MarkerStyle::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            export_csv: false,
            parallel_fetch: false,
            log_file: None,
        }
    }
}

impl PipelineOptions {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn flat_map_path(&self) -> PathBuf { self.out_dir.join(FLAT_MAP_FILE) }
    pub fn grouped_map_path(&self) -> PathBuf { self.out_dir.join(GROUPED_MAP_FILE) }
}

/// A borough name and the colour its markers get.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub color: String,
}

impl GroupSpec {
    pub fn new(name: &str, color: &str) -> Self {
        Self { name: s!(name), color: s!(color) }
    }
}

/// `NAME=COLOR`, split on the last `=`.
impl FromStr for GroupSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, color) = s
            .rsplit_once('=')
            .ok_or_else(|| Error::Config(format!("group {s:?} is not NAME=COLOR")))?;
        let (name, color) = (name.trim(), color.trim());
        if name.is_empty() || color.is_empty() {
            return Err(Error::Config(format!("group {s:?} is not NAME=COLOR")));
        }
        Ok(Self::new(name, color))
    }
}

/// Circle marker look. `color` is the stroke, `fill_color` the body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub color: String,
    pub fill_color: String,
    pub radius: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: s!(FLAT_COLOR),
            fill_color: s!(FLAT_FILL_COLOR),
            radius: MARKER_RADIUS,
            fill_opacity: MARKER_FILL_OPACITY,
        }
    }
}

impl MarkerStyle {
    /// Stroke and fill share one colour (grouped maps).
    pub fn solid(color: &str) -> Self {
        Self { color: s!(color), fill_color: s!(color), ..Self::default() }
    }
}

/// Parse `LAT,LON`.
pub fn parse_center(s: &str) -> Result<Coordinate> {
    let bad = || Error::Config(format!("center {s:?} is not LAT,LON"));
    let (lat, lon) = s.split_once(',').ok_or_else(bad)?;
    let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
    let lon: f64 = lon.trim().parse().map_err(|_| bad())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(bad());
    }
    Ok(Coordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_toronto_run() {
        let o = PipelineOptions::default();
        assert_eq!(o.filter, "Toronto");
        assert_eq!(o.flat_zoom, 10);
        assert_eq!(o.grouped_zoom, 12);
        assert_eq!(o.groups.len(), 4);
        assert_eq!(o.groups[1], GroupSpec::new("Central Toronto", "red"));
        assert_eq!(o.flat_style.fill_color, "#3186cc");
        assert!(o.flat_map_path().ends_with("neighbourhoods.html"));
    }

    #[test]
    fn toml_overrides_only_what_it_names() {
        let o = PipelineOptions::from_toml_str(r#"
            filter = "York"
            out_dir = "maps"
            center = { latitude = 43.7, longitude = -79.4 }

            [[groups]]
            name = "North York"
            color = "orange"
        "#).unwrap();
        assert_eq!(o.filter, "York");
        assert_eq!(o.out_dir, PathBuf::from("maps"));
        assert_eq!(o.center, Some(Coordinate::new(43.7, -79.4)));
        assert_eq!(o.groups, vec![GroupSpec::new("North York", "orange")]);
        assert_eq!(o.table_url, TABLE_URL);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PipelineOptions::from_toml_str("colour = 1").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn group_spec_from_str() {
        assert_eq!("West Toronto=green".parse::<GroupSpec>().unwrap(), GroupSpec::new("West Toronto", "green"));
        assert!("West Toronto".parse::<GroupSpec>().is_err());
        assert!("=green".parse::<GroupSpec>().is_err());
    }

    #[test]
    fn center_parsing() {
        assert_eq!(parse_center("43.6535, -79.3839").unwrap(), Coordinate::new(43.6535, -79.3839));
        assert!(parse_center("43.6").is_err());
        assert!(parse_center("143.6,0").is_err());
    }
}

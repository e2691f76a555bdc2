// src/config/consts.rs

// Sources
pub const TABLE_URL: &str = "https://en.wikipedia.org/wiki/List_of_postal_codes_of_Canada:_M";
pub const TABLE_INDEX: usize = 0;
pub const GEO_URL: &str = "http://cocl.us/Geospatial_data";

// Net config
pub const USER_AGENT: &str = "to_explorer";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Columns
pub const COL_POSTAL_CODE: &str = "Postal Code";
pub const COL_BOROUGH: &str = "Borough";
pub const COL_NEIGHBORHOOD: &str = "Neighborhood";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

// The page has used both spellings over the years
pub const POSTAL_CODE_ALIASES: &[&str] = &[COL_POSTAL_CODE, "Postcode", "Postal code"];
pub const NEIGHBORHOOD_ALIASES: &[&str] = &[COL_NEIGHBORHOOD, "Neighbourhood"];

// Cleaning + filtering
pub const UNASSIGNED: &str = "Not assigned";
pub const BOROUGH_FILTER: &str = "Toronto";

// Geocoding
pub const CENTER_ADDRESS: &str = "Toronto, Ontario";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

// Map
pub const FLAT_ZOOM: u8 = 10;
pub const GROUPED_ZOOM: u8 = 12;
pub const MARKER_RADIUS: f64 = 5.0;
pub const MARKER_FILL_OPACITY: f64 = 0.7;
pub const FLAT_COLOR: &str = "blue";
pub const FLAT_FILL_COLOR: &str = "#3186cc";
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Default (borough, colour) partition.
pub const DEFAULT_GROUPS: &[(&str, &str)] = &[
    ("Downtown Toronto", "blue"),
    ("Central Toronto", "red"),
    ("West Toronto", "green"),
    ("East Toronto", "purple"),
];

// Output
pub const DEFAULT_OUT_DIR: &str = "out";
pub const FLAT_MAP_FILE: &str = "neighbourhoods.html";
pub const GROUPED_MAP_FILE: &str = "boroughs.html";
pub const JOINED_CSV_FILE: &str = "joined.csv";
pub const FILTERED_CSV_FILE: &str = "filtered.csv";
pub const GROUPS_SUBDIR: &str = "groups";

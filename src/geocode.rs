// src/geocode.rs
use serde::Deserialize;
use tracing::info;

use crate::core::net;
use crate::data::Coordinate;
use crate::error::{Error, Result, Stage};

/// Free-text address → single best-match coordinate.
pub trait Geocoder: Sync {
    fn locate(&self, address: &str) -> Result<Coordinate>;
}

/// OpenStreetMap Nominatim search endpoint.
#[derive(Clone, Debug)]
pub struct Nominatim {
    pub endpoint: String,
}

impl Nominatim {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: s!(endpoint) }
    }
}

#[derive(Debug, Deserialize)]
struct Hit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl Geocoder for Nominatim {
    fn locate(&self, address: &str) -> Result<Coordinate> {
        let hits: Vec<Hit> = net::http_get_json(
            Stage::Geocode,
            &self.endpoint,
            &[("q", address), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| Error::geocode(address, e))?;
        let center = best_match(address, &hits)?;
        info!(
            address,
            place = hits.first().and_then(|h| h.display_name.as_deref()).unwrap_or(""),
            "geographical coordinate of {address} is {}, {}",
            center.latitude,
            center.longitude
        );
        Ok(center)
    }
}

fn best_match(address: &str, hits: &[Hit]) -> Result<Coordinate> {
    let hit = hits.first().ok_or_else(|| Error::geocode(address, "no result"))?;
    let lat = hit.lat.parse::<f64>().map_err(|e| Error::geocode(address, format!("latitude {:?}: {e}", hit.lat)))?;
    let lon = hit.lon.parse::<f64>().map_err(|e| Error::geocode(address, format!("longitude {:?}: {e}", hit.lon)))?;
    Ok(Coordinate::new(lat, lon))
}

/// Always answers with the same point; used when the centre is configured.
#[derive(Clone, Copy, Debug)]
pub struct FixedPoint(pub Coordinate);

impl Geocoder for FixedPoint {
    fn locate(&self, _address: &str) -> Result<Coordinate> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(json: &str) -> Vec<Hit> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn first_hit_wins() {
        let h = hits(r#"[
            {"lat": "43.6534817", "lon": "-79.3839347", "display_name": "Toronto, Golden Horseshoe, Ontario, Canada"},
            {"lat": "1", "lon": "2"}
        ]"#);
        assert_eq!(best_match("Toronto, Ontario", &h).unwrap(), Coordinate::new(43.6534817, -79.3839347));
    }

    #[test]
    fn no_hit_is_a_geocode_error() {
        let err = best_match("Atlantis", &hits("[]")).unwrap_err();
        assert!(matches!(err, Error::Geocode { .. }));
        assert_eq!(err.stage(), Stage::Geocode);
    }

    #[test]
    fn garbage_coordinates_are_rejected() {
        let h = hits(r#"[{"lat": "north", "lon": "-79"}]"#);
        assert!(best_match("x", &h).is_err());
    }

    #[test]
    fn fixed_point_ignores_the_address() {
        let c = Coordinate::new(43.65, -79.38);
        assert_eq!(FixedPoint(c).locate("anywhere").unwrap(), c);
    }
}

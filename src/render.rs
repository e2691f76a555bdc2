// src/render.rs
//! Map Renderer: one circle marker per located record on a Leaflet slippy map.
//!
//! Two flavours, mirroring how the maps are used:
//! - **flat**: every record in one layer, one style.
//! - **grouped**: one layer per `BoroughGroup`, each in its own colour.
//!
//! Records without both coordinates are skipped and reported as `RenderError`s
//! in the returned `RenderedMap`; they never fail the render.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{info, warn};

use crate::config::MarkerStyle;
use crate::config::consts::{TILE_ATTRIBUTION, TILE_URL};
use crate::core::sanitize::escape_html;
use crate::data::{BoroughGroup, Coordinate, RecordSet};
use crate::error::{RenderError, Result};

const TEMPLATE: &str = include_str!("templates/map.html");

/// Centre + zoom of a map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    /// Plain label, `"{neighborhood}, {borough}"`.
    #[serde(skip)]
    pub label: String,
    /// Label as it goes into the popup (HTML-escaped).
    pub popup: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layer {
    pub name: String,
    pub style: MarkerStyle,
    pub markers: Vec<Marker>,
}

#[derive(Clone, Debug)]
pub struct RenderedMap {
    pub title: String,
    pub view: MapView,
    pub layers: Vec<Layer>,
    pub skipped: Vec<RenderError>,
    pub html: String,
}

impl RenderedMap {
    pub fn marker_count(&self) -> usize {
        self.layers.iter().map(|l| l.markers.len()).sum()
    }
}

/// All records in one layer.
pub fn render_flat(title: &str, view: MapView, records: &RecordSet, style: &MarkerStyle) -> Result<RenderedMap> {
    let mut skipped = Vec::new();
    let layer = build_layer(title, records, style.clone(), &mut skipped);
    finish(title, view, vec![layer], skipped)
}

/// One layer per group, coloured as given.
pub fn render_grouped(title: &str, view: MapView, groups: &[(BoroughGroup, String)]) -> Result<RenderedMap> {
    let mut skipped = Vec::new();
    let layers: Vec<Layer> = groups
        .iter()
        .map(|(g, color)| build_layer(&g.name, &g.records, MarkerStyle::solid(color), &mut skipped))
        .collect();
    finish(title, view, layers, skipped)
}

fn build_layer(name: &str, records: &RecordSet, style: MarkerStyle, skipped: &mut Vec<RenderError>) -> Layer {
    let mut markers = Vec::with_capacity(records.len());
    for r in records {
        let Some(at) = r.coordinate() else {
            skipped.push(RenderError {
                postal_code: r.postal_code.clone(),
                reason: s!("missing latitude/longitude"),
            });
            continue;
        };
        let label = r.label();
        markers.push(Marker {
            lat: at.latitude,
            lng: at.longitude,
            popup: escape_html(&label),
            label,
        });
    }
    Layer { name: s!(name), style, markers }
}

fn finish(title: &str, view: MapView, layers: Vec<Layer>, skipped: Vec<RenderError>) -> Result<RenderedMap> {
    for e in &skipped {
        warn!("{e}");
    }
    let html = to_html(title, &view, &layers)?;
    let map = RenderedMap { title: s!(title), view, layers, skipped, html };
    info!(
        title,
        markers = map.marker_count(),
        layers = map.layers.len(),
        skipped = map.skipped.len(),
        "rendered map"
    );
    Ok(map)
}

fn to_html(title: &str, view: &MapView, layers: &[Layer]) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("title", &escape_html(title));
    ctx.insert("center_lat", &view.center.latitude);
    ctx.insert("center_lng", &view.center.longitude);
    ctx.insert("zoom", &view.zoom);
    ctx.insert("tile_url", &script_json(&TILE_URL)?);
    ctx.insert("attribution", &script_json(&TILE_ATTRIBUTION)?);
    ctx.insert("layers", &script_json(layers)?);
    Ok(Tera::one_off(TEMPLATE, &ctx, false)?)
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace('<', "\\u003c"))
}

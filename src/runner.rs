// src/runner.rs
//! The whole run, top to bottom:
//!
//! ```text
//! table fetch → geo join → borough filter → geocode → render → output
//! ```
//!
//! Every stage consumes the complete output of the one before it. The first
//! stage error aborts the run; records the renderer cannot place are only
//! reported.

use std::path::PathBuf;
use std::thread;

use tracing::{debug, info, warn};

use crate::{
    config::{GroupSpec, PipelineOptions, consts::{FILTERED_CSV_FILE, GROUPS_SUBDIR, JOINED_CSV_FILE}},
    data::{BoroughGroup, Coordinate, RecordSet, Table},
    error::{Error, Result, Stage},
    file, filter,
    geocode::{FixedPoint, Geocoder, Nominatim},
    join::{self, JoinStats},
    progress::Progress,
    render::{self, MapView, RenderedMap},
    source::Fetch,
    specs,
};

const STAGES: usize = 6;

/// Everything a run computed, before anything is written.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Rows left after dropping unassigned boroughs.
    pub table_rows: usize,
    pub joined: RecordSet,
    pub join_stats: JoinStats,
    pub filtered: RecordSet,
    pub groups: Vec<BoroughGroup>,
    pub center: Coordinate,
    pub flat_map: RenderedMap,
    pub grouped_map: RenderedMap,
}

/// Summary of what was produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub files_written: Vec<PathBuf>,
}

/// Geocoder for `opts`: the configured centre if there is one, Nominatim otherwise.
pub fn geocoder_for(opts: &PipelineOptions) -> Box<dyn Geocoder> {
    match opts.center {
        Some(c) => Box::new(FixedPoint(c)),
        None => Box::new(Nominatim::new(&opts.nominatim_url)),
    }
}

/// Run every stage and write the artifacts under `opts.out_dir`.
/// Pass `&mut NullProgress` when nobody is watching.
pub fn run(
    opts: &PipelineOptions,
    fetcher: &dyn Fetch,
    geocoder: &dyn Geocoder,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    progress.begin(STAGES);
    let result = execute(opts, fetcher, geocoder, progress).and_then(|outcome| {
        stage(progress, Stage::Output);
        let files_written = write_outputs(opts, &outcome)?;
        done(progress, Stage::Output, files_written.len());
        Ok(RunSummary { outcome, files_written })
    });
    if let Err(e) = &result {
        progress.log(&format!("aborted: {e}"));
    }
    progress.finish();
    result
}

/// Run the five computing stages in memory.
pub fn execute(
    opts: &PipelineOptions,
    fetcher: &dyn Fetch,
    geocoder: &dyn Geocoder,
    progress: &mut dyn Progress,
) -> Result<Outcome> {
    // 1 + 2: sources
    stage(progress, Stage::TableFetch);
    let (table, geo) = fetch_sources(opts, fetcher)?;
    let table = specs::table::drop_unassigned(table)?;
    let table_rows = table.len();
    done(progress, Stage::TableFetch, table_rows);

    stage(progress, Stage::GeoJoin);
    let joined = join::outer_join(&table, &geo)?;
    done(progress, Stage::GeoJoin, joined.records.len());

    // 3
    stage(progress, Stage::BoroughFilter);
    let filtered = filter::by_borough_substring(&joined.records, &opts.filter);
    let wanted = distinct_groups(&opts.groups);
    let names: Vec<&str> = wanted.iter().map(|g| g.name.as_str()).collect();
    let groups = filter::partition_by_borough(&filtered, names.as_slice());
    for g in &groups {
        info!(group = %g.name, records = g.len(), "group");
    }
    done(progress, Stage::BoroughFilter, filtered.len());

    // 4
    stage(progress, Stage::Geocode);
    let center = geocoder.locate(&opts.address)?;
    done(progress, Stage::Geocode, 1);

    // 5
    stage(progress, Stage::Render);
    let flat_map = render::render_flat(
        &format!("{} neighbourhoods", opts.filter),
        MapView { center, zoom: opts.flat_zoom },
        &filtered,
        &opts.flat_style,
    )?;
    let coloured: Vec<(BoroughGroup, String)> = groups
        .iter()
        .cloned()
        .zip(wanted.iter().map(|g| g.color.clone()))
        .collect();
    let grouped_map = render::render_grouped(
        &format!("{} neighbourhoods by borough", opts.filter),
        MapView { center, zoom: opts.grouped_zoom },
        &coloured,
    )?;
    done(progress, Stage::Render, flat_map.marker_count() + grouped_map.marker_count());

    Ok(Outcome {
        table_rows,
        joined: joined.records,
        join_stats: joined.stats,
        filtered,
        groups,
        center,
        flat_map,
        grouped_map,
    })
}

/// Both source tables. Sequential by default; with `parallel_fetch` the two
/// independent downloads overlap. A table failure wins over a geo failure.
pub fn fetch_sources(opts: &PipelineOptions, fetcher: &dyn Fetch) -> Result<(Table, Table)> {
    if !opts.parallel_fetch {
        let table = specs::table::fetch(fetcher, &opts.table_url, opts.table_index)?;
        let geo = specs::geo::fetch(fetcher, &opts.geo_url)?;
        return Ok((table, geo));
    }

    debug!("fetching sources in parallel");
    thread::scope(|scope| {
        let geo = scope.spawn(|| specs::geo::fetch(fetcher, &opts.geo_url));
        let table = specs::table::fetch(fetcher, &opts.table_url, opts.table_index);
        let geo = geo
            .join()
            .map_err(|_| Error::fetch(Stage::GeoJoin, &opts.geo_url, "fetch thread panicked"))?;
        Ok((table?, geo?))
    })
}

/// Group specs with repeated names dropped; the first colour given for a name wins.
pub fn distinct_groups(groups: &[GroupSpec]) -> Vec<&GroupSpec> {
    let mut out: Vec<&GroupSpec> = Vec::with_capacity(groups.len());
    for g in groups {
        if out.iter().any(|seen| seen.name == g.name) {
            warn!(group = %g.name, color = %g.color, "group listed twice; keeping the first colour");
            continue;
        }
        out.push(g);
    }
    out
}

fn write_outputs(opts: &PipelineOptions, outcome: &Outcome) -> Result<Vec<PathBuf>> {
    let mut written = vec![
        file::write_map(&opts.flat_map_path(), &outcome.flat_map)?,
        file::write_map(&opts.grouped_map_path(), &outcome.grouped_map)?,
    ];
    if opts.export_csv {
        written.push(file::write_records_csv(&opts.out_dir.join(JOINED_CSV_FILE), &outcome.joined)?);
        written.push(file::write_records_csv(&opts.out_dir.join(FILTERED_CSV_FILE), &outcome.filtered)?);
        written.extend(file::write_groups_csv(&opts.out_dir.join(GROUPS_SUBDIR), &outcome.groups)?);
    }
    Ok(written)
}

fn stage(progress: &mut dyn Progress, s: Stage) {
    info!(stage = %s, "stage start");
    progress.stage(s);
}

fn done(progress: &mut dyn Progress, s: Stage, items: usize) {
    debug!(stage = %s, items, "stage done");
    progress.stage_done(s, items);
}

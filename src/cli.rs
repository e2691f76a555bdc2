// src/cli.rs
use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::options::{GroupSpec, PipelineOptions, parse_center};
use crate::data::Coordinate;
use crate::error::{Result, Stage};
use crate::progress::Progress;
use crate::runner::{self, RunSummary};
use crate::source::Fetcher;

/// Scrape Toronto postal codes, join them with coordinates and plot the
/// Toronto boroughs on Leaflet maps.
#[derive(Debug, Parser)]
#[command(name = "borough_map", version, about)]
pub struct Args {
    /// TOML file with pipeline options; flags below override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Page holding the postal code table (URL or local path)
    #[arg(long, value_name = "URL")]
    pub table_url: Option<String>,

    /// Which <table> on the page, 0-based
    #[arg(long, value_name = "N")]
    pub table_index: Option<usize>,

    /// CSV with Postal Code, Latitude, Longitude (URL or local path)
    #[arg(long, value_name = "URL")]
    pub geo_url: Option<String>,

    /// Keep records whose borough contains this text
    #[arg(short, long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Borough group and its marker colour; repeat to list several
    #[arg(short, long = "group", value_name = "NAME=COLOR")]
    pub groups: Vec<GroupSpec>,

    /// Address the maps are centred on
    #[arg(long)]
    pub address: Option<String>,

    /// Centre the maps here instead of geocoding the address
    #[arg(long, value_name = "LAT,LON", value_parser = parse_center, allow_hyphen_values = true)]
    pub center: Option<Coordinate>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Also write joined, filtered and per-group CSV files
    #[arg(long)]
    pub export_csv: bool,

    /// Download both sources at the same time
    #[arg(long)]
    pub parallel_fetch: bool,

    /// Append log lines to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn options(&self) -> Result<PipelineOptions> {
        let mut opts = match &self.config {
            Some(path) => PipelineOptions::from_toml_file(path)?,
            None => PipelineOptions::default(),
        };
        if let Some(v) = &self.table_url { opts.table_url = v.clone(); }
        if let Some(v) = self.table_index { opts.table_index = v; }
        if let Some(v) = &self.geo_url { opts.geo_url = v.clone(); }
        if let Some(v) = &self.filter { opts.filter = v.clone(); }
        if !self.groups.is_empty() { opts.groups = self.groups.clone(); }
        if let Some(v) = &self.address { opts.address = v.clone(); }
        if self.center.is_some() { opts.center = self.center; }
        if let Some(v) = &self.out { opts.out_dir = v.clone(); }
        if self.export_csv { opts.export_csv = true; }
        if self.parallel_fetch { opts.parallel_fetch = true; }
        if self.log_file.is_some() { opts.log_file = self.log_file.clone(); }
        Ok(opts)
    }
}

/// Stage lines on stderr, `[2/6] geo join ... 103`.
pub struct ConsoleProgress {
    done: usize,
    total: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self { done: 0, total: 0 }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn stage(&mut self, stage: Stage) {
        eprint!("[{}/{}] {stage} ... ", self.done + 1, self.total);
        let _ = std::io::stderr().flush();
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn stage_done(&mut self, _stage: Stage, items: usize) {
        self.done += 1;
        eprintln!("{items}");
    }
    fn finish(&mut self) {
        if self.done < self.total {
            eprintln!("stopped after {}/{} stages", self.done, self.total);
        }
    }
}

pub fn run(args: Args) -> Result<RunSummary> {
    let opts = args.options()?;
    crate::log::init(args.verbose, opts.log_file.as_deref())?;

    let geocoder = runner::geocoder_for(&opts);
    let mut progress = ConsoleProgress::new();
    let summary = runner::run(&opts, &Fetcher, geocoder.as_ref(), &mut progress)?;

    let o = &summary.outcome;
    println!(
        "{} postal codes, {} joined ({} without coordinates), {} in {:?}",
        o.table_rows,
        o.joined.len(),
        o.join_stats.left_only,
        o.filtered.len(),
        opts.filter
    );
    for g in &o.groups {
        println!("  {}: {}", g.name, g.len());
    }
    for path in &summary.files_written {
        println!("wrote {}", path.display());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "borough_map",
            "--filter", "York",
            "-g", "North York=orange",
            "-g", "East York=teal",
            "--center", "-12.5,130.8",
            "--out", "maps",
            "--export-csv",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);

        let o = args.options().unwrap();
        assert_eq!(o.filter, "York");
        assert_eq!(o.groups, vec![GroupSpec::new("North York", "orange"), GroupSpec::new("East York", "teal")]);
        assert_eq!(o.center, Some(Coordinate::new(-12.5, 130.8)));
        assert_eq!(o.out_dir, PathBuf::from("maps"));
        assert!(o.export_csv);
        assert!(!o.parallel_fetch);
        assert_eq!(o.table_url, PipelineOptions::default().table_url);
    }

    #[test]
    fn flags_win_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "filter = \"York\"\nparallel_fetch = true\n").unwrap();

        let args = Args::try_parse_from([
            "borough_map",
            "--config", path.to_str().unwrap(),
            "--filter", "Scarborough",
        ])
        .unwrap();
        let o = args.options().unwrap();
        assert_eq!(o.filter, "Scarborough");
        assert!(o.parallel_fetch);
        assert_eq!(o.groups.len(), 4);
    }

    #[test]
    fn malformed_values_are_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["borough_map", "--group", "Downtown"]).is_err());
        assert!(Args::try_parse_from(["borough_map", "--center", "north"]).is_err());
    }
}

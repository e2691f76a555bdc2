// src/error.rs
//! Error taxonomy for the pipeline.
//!
//! Stage-level failures (`Error`) are fatal and abort the run. A record that
//! cannot be plotted is reported as a `RenderError` inside the render report
//! and never travels through `?`.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    TableFetch,
    GeoJoin,
    BoroughFilter,
    Geocode,
    Render,
    Output,
    Config,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::TableFetch    => "table fetch",
            Stage::GeoJoin       => "geo join",
            Stage::BoroughFilter => "borough filter",
            Stage::Geocode       => "geocode",
            Stage::Render        => "render",
            Stage::Output        => "output",
            Stage::Config        => "config",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Network failure or non-success HTTP status.
    #[error("[{stage}] fetch failed for {url}: {reason}")]
    Fetch { stage: Stage, url: String, reason: String },

    /// Malformed document or missing table.
    #[error("[{stage}] parse error: {reason}")]
    Parse { stage: Stage, reason: String },

    /// Join key column absent, or key not unique.
    #[error("[geo join] join error: {reason}")]
    Join { reason: String },

    /// Address could not be resolved.
    #[error("[geocode] could not resolve {address:?}: {reason}")]
    Geocode { address: String, reason: String },

    #[error("[config] {0}")]
    Config(String),

    #[error("[output] I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[output] CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("[render] template error: {0}")]
    Template(#[from] tera::Error),

    /// Map data could not be encoded for the page.
    #[error("[render] could not encode map data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    pub fn fetch(stage: Stage, url: &str, reason: impl fmt::Display) -> Self {
        Self::Fetch { stage, url: s!(url), reason: reason.to_string() }
    }

    pub fn parse(stage: Stage, reason: impl fmt::Display) -> Self {
        Self::Parse { stage, reason: reason.to_string() }
    }

    pub fn join(reason: impl fmt::Display) -> Self {
        Self::Join { reason: reason.to_string() }
    }

    pub fn geocode(address: &str, reason: impl fmt::Display) -> Self {
        Self::Geocode { address: s!(address), reason: reason.to_string() }
    }

    /// Stage the failure aborted.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Fetch { stage, .. } | Error::Parse { stage, .. } => *stage,
            Error::Join { .. } => Stage::GeoJoin,
            Error::Geocode { .. } => Stage::Geocode,
            Error::Config(_) => Stage::Config,
            Error::Io(_) | Error::Csv(_) => Stage::Output,
            Error::Template(_) | Error::Encode(_) => Stage::Render,
        }
    }
}

/// A record skipped by the renderer. Non-fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderError {
    pub postal_code: String,
    pub reason: String,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}: {}", self.postal_code, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_stage() {
        let e = Error::fetch(Stage::TableFetch, "https://example.org", "HTTP 404");
        assert_eq!(e.stage(), Stage::TableFetch);
        assert!(e.to_string().starts_with("[table fetch]"));

        let e = Error::join("missing column \"Postal Code\"");
        assert_eq!(e.stage(), Stage::GeoJoin);
        assert!(e.to_string().contains("geo join"));

        let e = Error::geocode("Toronto, Ontario", "no result");
        assert_eq!(e.stage(), Stage::Geocode);
        assert!(e.to_string().contains("Toronto, Ontario"));
    }
}

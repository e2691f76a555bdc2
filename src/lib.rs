// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod file;
pub mod filter;
pub mod geocode;
pub mod join;
pub mod log;
pub mod progress;
pub mod render;
pub mod runner;
pub mod source;
pub mod specs;

#[cfg(feature = "cli")]
pub mod cli;

pub use data::{BoroughGroup, Coordinate, Record, RecordSet, Table};
pub use error::{Error, RenderError, Result, Stage};

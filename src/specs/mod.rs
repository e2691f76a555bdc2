// src/specs/mod.rs
//! # Source “specs” module
//!
//! Each spec knows how to read **one kind of source document** and turn it into
//! typed rows. Specs reach their documents only through `source::Fetch`, and
//! the parsers take plain text, so everything here runs offline against
//! captured fixtures.
//!
//! ## What lives here
//! - **`table`**: HTML pages. Every top-level `<table>` is parsed; the first row
//!   provides the column names. The postal-code table is cleaned of rows whose
//!   borough is the `"Not assigned"` sentinel.
//! - **`geo`**: the postal-code → coordinate CSV, parsed with the `csv` crate.
//!
//! ## What does **not** live here
//! - **Joining** (`join`), **filtering** (`filter`) and **rendering** (`render`).
//! - **Fetching** (`source`, `core::net`).
//!
//! ## Conventions & invariants
//! - Tag detection is case-insensitive and respects tag-name boundaries
//!   (`<th` never matches `<thead`).
//! - Cell text is tag-stripped, entity-decoded and whitespace-collapsed.
//! - Row order is source order.
pub mod geo;
pub mod table;

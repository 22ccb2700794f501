//! # NSArchive
//!
//! Builds the browsable catalog page of the NationStates daily dump archive.
//! The archive bucket holds one object per category per day, named after the
//! day it was taken; this crate turns a listing of that bucket into a single
//! static HTML page and publishes it back to the bucket.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      store listing  →  catalog.json   (object names → sorted Catalog)
//! 2. Generate  catalog.json   →  index.html     (Catalog → HTML)
//! 3. Publish   index.html     →  store          (put as text/html)
//! ```
//!
//! Scan and Generate are pure functions of their input apart from the store
//! listing itself, so unit tests exercise them with in-memory data.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: lists each category prefix and assembles the catalog |
//! | [`catalog`] | Year → Month → Day tree with lazy node creation and stabilization sort |
//! | [`generate`] | Stage 2/3: renders the page with Maud and publishes it |
//! | [`naming`] | `<category>/YYYY-MM-DD-<category>.<ext>` object name parser |
//! | [`store`] | `ObjectStore` trait and the local-directory `FsStore` |
//! | [`config`] | `nsarchive.toml` loading, merging and validation |
//! | [`types`] | Shared types (`Category`, `CalendarDate`, `ObjectRecord`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Rebuild Every Run
//!
//! The catalog is rebuilt from a full listing on every run and never updated
//! in place. A listing of a few thousand names is cheap, and a rebuilt page
//! cannot drift from what the bucket actually holds.
//!
//! ## Fail Closed on Malformed Names
//!
//! An object whose name does not match its category's template aborts the run
//! before anything is published. Skipping it would leave a silent hole in an
//! archive whose point is completeness.
//!
//! ## Last Write Wins
//!
//! Each (date, category) pair should map to exactly one object. If a listing
//! yields two, the later one replaces the earlier in the catalog and the
//! overwrite is counted in the scan output.

pub mod catalog;
pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

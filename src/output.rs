//! CLI output formatting for all pipeline stages.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure -
//! no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Listing
//!     nations: 812 objects
//!     regions: 812 objects
//!     foundings: 811 objects
//!
//! Catalog
//! 2023 (3 months, 92 days)
//!     October (31 days)
//!     November (30 days)
//!     December (31 days)
//!
//! Slots: 2435 filled, 0 overwritten
//! ```
//!
//! ## Generate
//!
//! ```text
//! Catalog → dist/index.html (92 days, 48.1 kB)
//! ```

use crate::catalog::Catalog;
use crate::generate::{format_size, month_name};
use crate::scan::ScanResult;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Per-year and per-month day counts in catalog order.
pub fn format_catalog_tree(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();
    for year in catalog.years() {
        let days: usize = year.months().iter().map(|m| m.days().len()).sum();
        lines.push(format!(
            "{} ({}, {})",
            year.year(),
            plural(year.months().len(), "month", "months"),
            plural(days, "day", "days")
        ));
        for month in year.months() {
            let name = month_name(month.month())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Month {}", month.month()));
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                name,
                plural(month.days().len(), "day", "days")
            ));
        }
    }
    lines
}

/// Format scan stage output: listing counts, catalog shape, slot counts.
pub fn format_scan_output(result: &ScanResult) -> Vec<String> {
    let mut lines = vec!["Listing".to_string()];
    for (category, count) in &result.listed {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            category,
            plural(*count, "object", "objects")
        ));
    }

    lines.push(String::new());
    lines.push("Catalog".to_string());
    if result.catalog.is_empty() {
        lines.push(format!("{}(empty)", indent(1)));
    } else {
        lines.extend(format_catalog_tree(&result.catalog));
    }

    lines.push(String::new());
    lines.push(format!(
        "Slots: {} filled, {} overwritten",
        result.catalog.slot_count(),
        result.stats.overwritten
    ));
    if result.stats.overwritten > 0 {
        lines.push(format!(
            "{}duplicate (date, category) objects: last listed wins",
            indent(1)
        ));
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(result: &ScanResult) {
    for line in format_scan_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: where the page went and how big it is.
pub fn format_generate_output(catalog: &Catalog, output: &Path, bytes: usize) -> Vec<String> {
    vec![format!(
        "Catalog \u{2192} {} ({}, {})",
        output.display(),
        plural(catalog.day_count(), "day", "days"),
        format_size(bytes as u64)
    )]
}

/// Print generate output to stdout.
pub fn print_generate_output(catalog: &Catalog, output: &Path, bytes: usize) {
    for line in format_generate_output(catalog, output, bytes) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Publish output
// ============================================================================

pub fn format_publish_output(object: &str, content_type: &str, bytes: usize) -> Vec<String> {
    vec![format!(
        "Published {} ({}, {})",
        object,
        content_type,
        format_size(bytes as u64)
    )]
}

pub fn print_publish_output(object: &str, content_type: &str, bytes: usize) {
    for line in format_publish_output(object, content_type, bytes) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

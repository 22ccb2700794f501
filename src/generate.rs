//! Catalog page generation.
//!
//! Stage 2 of the pipeline. Takes the sorted [`Catalog`] and renders the single
//! static page that lists every archived object.
//!
//! ## Page Structure
//!
//! ```text
//! NSArchive                          # <h1> from site.title
//! intro paragraph                    # site.intro, markdown
//! ▸ 2023                             # <details><summary class="year">
//!   ▸ December                       #   <details><summary class="month">
//!     2023-12-31                     #     <h4>
//!       • foundings (12.3 kB)        #     <ul><li> per populated category
//! ▸ 2024
//!   ▸ January
//!     2024-01-05
//!       • nations (41.2 MB)
//!       • regions (9.8 MB)
//! ```
//!
//! Years, months and days appear in catalog order, which is ascending after
//! the scan stage's stabilization sort. Categories within a day always appear
//! as nations, regions, foundings. A day with no populated slot is skipped, and
//! so is a month or year with nothing visible beneath it.
//!
//! ## Determinism
//!
//! Rendering is a pure function of the catalog and site config: no timestamps,
//! no hash-map iteration. The same inputs produce the same bytes, so an
//! unchanged archive republishes an identical page.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating with
//! automatic escaping. The stylesheet is embedded from `static/style.css`.

use crate::catalog::{Catalog, DayNode, MonthNode, Slot, YearNode};
use crate::config::SiteConfig;
use crate::store::{ObjectStore, StoreError};
use crate::types::Category;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// MIME type the catalog page is published with.
pub const CONTENT_TYPE: &str = "text/html; charset=utf-8";

const CSS: &str = include_str!("../static/style.css");

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar name for a 1-indexed month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// Human-readable size in SI units: `999 B`, `1.5 kB`, `41.2 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1000;
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let prefix = ['k', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {}B", bytes as f64 / div as f64, prefix)
}

/// Render the catalog page as UTF-8 HTML.
pub fn render(catalog: &Catalog, site: &SiteConfig) -> Vec<u8> {
    render_page(catalog, site).into_string().into_bytes()
}

/// Load the scan stage's `catalog.json`, render it, and write the page.
///
/// Returns the loaded catalog so callers can report on it.
pub fn generate(
    catalog_path: &Path,
    output_path: &Path,
    site: &SiteConfig,
) -> Result<Catalog, GenerateError> {
    let json = fs::read_to_string(catalog_path)?;
    let catalog = Catalog::from_json(&json)?;
    write_page(output_path, &render(&catalog, site))?;
    Ok(catalog)
}

/// Write a rendered page, creating parent directories as needed.
pub fn write_page(output_path: &Path, html: &[u8]) -> Result<(), GenerateError> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, html)?;
    Ok(())
}

/// Upload a rendered page to the store under `site.index_object`.
pub fn publish(
    store: &dyn ObjectStore,
    site: &SiteConfig,
    html: &[u8],
) -> Result<(), GenerateError> {
    store.put(&site.index_object, html, CONTENT_TYPE)?;
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the intro markdown. Raw HTML in the markdown is passed through.
fn render_intro(markdown: &str) -> Markup {
    let parser = Parser::new(markdown);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    html! {
        div.intro { (PreEscaped(body_html)) }
    }
}

fn render_page(catalog: &Catalog, site: &SiteConfig) -> Markup {
    let content = html! {
        h1 { (site.title) }
        (render_intro(&site.intro))
        main.catalog {
            @for year in catalog.years().iter().filter(|y| y.has_entries()) {
                (render_year(year))
            }
        }
    };

    base_document(&site.title, CSS, content)
}

fn render_year(year: &YearNode) -> Markup {
    html! {
        details {
            summary.year { (year.year()) }
            @for month in year.months().iter().filter(|m| m.has_entries()) {
                (render_month(year.year(), month))
            }
        }
    }
}

fn render_month(year: i32, month: &MonthNode) -> Markup {
    let name = month_name(month.month())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Month {}", month.month()));

    html! {
        details {
            summary.month { (name) }
            @for day in month.days().iter().filter(|d| !d.is_empty()) {
                (render_day(year, month.month(), day))
            }
        }
    }
}

fn render_day(year: i32, month: u32, day: &DayNode) -> Markup {
    let label = format!("{:04}-{:02}-{:02}", year, month, day.day());
    html! {
        h4 { (label) }
        ul {
            @for (category, slot) in day.populated() {
                (render_slot(category, slot))
            }
        }
    }
}

/// One archived object: link, size and checksum.
///
/// Foundings are JSON, which browsers would display inline, so their link
/// carries `download`.
fn render_slot(category: Category, slot: &Slot) -> Markup {
    html! {
        li {
            a href=(slot.url) download[category == Category::Foundings] { (category.label()) }
            @if let Some(size) = slot.size {
                " (" (format_size(size)) ")"
            }
            @if let Some(checksum) = &slot.checksum {
                br;
                "SHA-256: "
                code { (checksum) }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! End-to-end pipeline tests against a store mirrored into a temp directory.
//!
//! Each test lays out an archive bucket on disk, then drives scan → render →
//! publish through the library API the CLI uses.

use nsarchive::catalog::Catalog;
use nsarchive::config::{ArchiveConfig, StorageConfig};
use nsarchive::generate::{self, CONTENT_TYPE};
use nsarchive::scan::{ScanError, scan};
use nsarchive::store::{FsStore, ObjectStore};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const OBJECTS: &[&str] = &[
    "nations/2024-01-05-nations.xml.gz",
    "nations/2024-01-06-nations.xml.gz",
    "regions/2024-01-05-regions.xml.gz",
    "foundings/2023-12-31-foundings.json",
    "foundings/2024-01-05-foundings.json",
];

fn archive(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        write_object(tmp.path(), name, b"dump");
    }
    tmp
}

fn write_object(root: &Path, name: &str, data: &[u8]) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

fn build_page(store: &FsStore, config: &ArchiveConfig) -> Result<(Catalog, String), ScanError> {
    let result = scan(store, &config.storage)?;
    let html = generate::render(&result.catalog, &config.site);
    Ok((result.catalog, String::from_utf8(html).unwrap()))
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in rendered page"))
}

#[test]
fn full_pipeline_publishes_sorted_catalog() {
    let tmp = archive(OBJECTS);
    let config = ArchiveConfig::default();
    let store = FsStore::new(tmp.path());

    let (catalog, html) = build_page(&store, &config).unwrap();
    assert_eq!(catalog.day_count(), 3);
    assert_eq!(catalog.slot_count(), OBJECTS.len());

    generate::publish(&store, &config.site, html.as_bytes()).unwrap();
    let published = fs::read_to_string(tmp.path().join("index.html")).unwrap();
    assert_eq!(published, html);

    assert!(position(&html, "<h4>2023-12-31</h4>") < position(&html, "<h4>2024-01-05</h4>"));
    assert!(position(&html, "<h4>2024-01-05</h4>") < position(&html, "<h4>2024-01-06</h4>"));
    assert!(html.contains(
        r#"<a href="file/nsarchive/nations/2024-01-05-nations.xml.gz">nations</a> (4 B)"#
    ));
    assert!(html.contains(
        r#"<a href="file/nsarchive/foundings/2023-12-31-foundings.json" download>foundings</a>"#
    ));
}

#[test]
fn published_index_is_not_listed_on_rescan() {
    let tmp = archive(OBJECTS);
    let config = ArchiveConfig::default();
    let store = FsStore::new(tmp.path());

    let (first_catalog, first) = build_page(&store, &config).unwrap();
    generate::publish(&store, &config.site, first.as_bytes()).unwrap();

    let (second_catalog, second) = build_page(&store, &config).unwrap();
    assert_eq!(first_catalog, second_catalog);
    assert_eq!(first, second, "republishing an unchanged archive must be byte-identical");
}

#[test]
fn malformed_name_aborts_before_publishing() {
    let mut names = OBJECTS.to_vec();
    names.push("nations/2024-02-30-nations.xml.gz");
    let tmp = archive(&names);
    let store = FsStore::new(tmp.path());

    let err = build_page(&store, &ArchiveConfig::default()).unwrap_err();
    assert!(matches!(err, ScanError::MalformedRecordName(_)));
    assert!(err.to_string().contains("nations/2024-02-30-nations.xml.gz"));
    assert!(!tmp.path().join("index.html").exists());
}

#[test]
fn empty_archive_renders_intro_only() {
    let tmp = TempDir::new().unwrap();
    let store = FsStore::new(tmp.path());

    let (catalog, html) = build_page(&store, &ArchiveConfig::default()).unwrap();
    assert!(catalog.is_empty());
    assert!(html.contains("<h1>NSArchive</h1>"));
    assert!(!html.contains("<h4>"));
}

#[test]
fn checksums_are_rendered_when_enabled() {
    let tmp = archive(&["regions/2024-01-05-regions.xml.gz"]);
    let store = FsStore::new(tmp.path()).with_checksums(true);

    let (catalog, html) = build_page(&store, &ArchiveConfig::default()).unwrap();
    let day = catalog.days().next().unwrap().1;
    let checksum = day.populated().next().unwrap().1.checksum.clone().unwrap();
    assert!(html.contains(&format!("SHA-256: <code>{checksum}</code>")));
}

#[test]
fn custom_url_template_is_applied() {
    let tmp = archive(&["foundings/2024-01-05-foundings.json"]);
    let mut config = ArchiveConfig::default();
    config.storage = StorageConfig {
        url_template: "https://archive.example/{name}".to_string(),
        checksums: false,
    };
    let store = FsStore::new(tmp.path());

    let (_, html) = build_page(&store, &config).unwrap();
    assert!(html.contains(r#"href="https://archive.example/foundings/2024-01-05-foundings.json""#));
}

#[test]
fn publish_uses_configured_object_name() {
    let tmp = TempDir::new().unwrap();
    let mut config = ArchiveConfig::default();
    config.site.index_object = "site/catalog.html".to_string();
    let store = FsStore::new(tmp.path());

    generate::publish(&store, &config.site, b"<html></html>").unwrap();
    assert!(tmp.path().join("site/catalog.html").exists());
    // The page object itself sits outside every category prefix.
    assert_eq!(store.list("site/").unwrap().len(), 1);
    assert_eq!(CONTENT_TYPE, "text/html; charset=utf-8");
}

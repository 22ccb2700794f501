//! Storage listing and catalog assembly.
//!
//! Stage 1 of the pipeline. Lists each category prefix of the archive bucket
//! in turn, parses every object name against its category's template, resolves
//! its public URL, and feeds the category's records into one accumulating
//! [`Catalog`]:
//!
//! ```text
//! list("nations/")   ─┐
//! list("regions/")   ─┼─→  parse + resolve URL  →  Catalog::extend  →  sorted Catalog
//! list("foundings/") ─┘
//! ```
//!
//! ## Validation
//!
//! Every listed object must match its category's template. A single malformed
//! name aborts the scan: a catalog with a silently missing day would break the
//! archive's completeness guarantee, and nothing is published from a failed
//! scan.

use crate::catalog::{BuildStats, Catalog, Slot};
use crate::config::StorageConfig;
use crate::naming::{NameError, parse_object_name};
use crate::store::{ObjectInfo, ObjectStore, StoreError};
use crate::types::{Category, ObjectRecord};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    MalformedRecordName(#[from] NameError),
}

/// Output of the scan stage.
#[derive(Debug)]
pub struct ScanResult {
    /// Sorted catalog of everything listed.
    pub catalog: Catalog,
    /// Inserted/overwritten slot counts across all categories.
    pub stats: BuildStats,
    /// Number of objects listed per category.
    pub listed: BTreeMap<Category, usize>,
}

pub fn scan(store: &dyn ObjectStore, storage: &StorageConfig) -> Result<ScanResult, ScanError> {
    let mut catalog = Catalog::new();
    let mut stats = BuildStats::default();
    let mut listed = BTreeMap::new();

    for category in Category::ALL {
        let objects = store.list(category.prefix())?;
        listed.insert(category, objects.len());

        let entries = objects
            .into_iter()
            .map(|info| resolve(info, category, storage))
            .collect::<Result<Vec<_>, _>>()?;
        stats.merge(catalog.extend(entries));
    }

    Ok(ScanResult {
        catalog,
        stats,
        listed,
    })
}

/// Parse a listed object and build the slot that points at it.
fn resolve(
    info: ObjectInfo,
    category: Category,
    storage: &StorageConfig,
) -> Result<(ObjectRecord, Slot), NameError> {
    let record = parse_object_name(&info.name, category)?;
    let slot = Slot {
        url: storage.object_url(&info.name),
        size: Some(info.size),
        checksum: info.checksum,
    };
    Ok((record, slot))
}

//! Shared test utilities for the nsarchive test suite.
//!
//! Provides record builders, catalog lookups that panic with a readable
//! message on a miss, and an in-memory [`ObjectStore`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = build(vec![entry(2024, 1, 5, Category::Nations)]);
//! let day = find_day(&catalog, 2024, 1, 5);
//! assert_eq!(slot_categories(day), vec![Category::Nations]);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::catalog::{Catalog, DayNode, Slot};
use crate::naming::object_name;
use crate::store::{ObjectInfo, ObjectStore, StoreError};
use crate::types::{CalendarDate, Category, ObjectRecord};

// =========================================================================
// Record builders
// =========================================================================

/// A date that must exist. Panics otherwise.
pub fn date(year: i32, month: u32, day: u32) -> CalendarDate {
    CalendarDate::from_ymd(year, month, day)
        .unwrap_or_else(|| panic!("{year}-{month}-{day} is not a calendar date"))
}

/// A record with its canonical object name.
pub fn record(year: i32, month: u32, day: u32, category: Category) -> ObjectRecord {
    let date = date(year, month, day);
    ObjectRecord {
        name: object_name(category, date),
        category,
        date,
    }
}

/// A record paired with a slot whose URL is the object name.
pub fn entry(year: i32, month: u32, day: u32, category: Category) -> (ObjectRecord, Slot) {
    let record = record(year, month, day, category);
    let slot = Slot::new(record.name.clone());
    (record, slot)
}

/// A record paired with a slot pointing at `url`.
pub fn entry_with_url(
    year: i32,
    month: u32,
    day: u32,
    category: Category,
    url: &str,
) -> (ObjectRecord, Slot) {
    (record(year, month, day, category), Slot::new(url))
}

// =========================================================================
// Catalog lookups: panics with a clear message on miss
// =========================================================================

/// Find a day by date. Panics if the catalog has no node for it.
pub fn find_day(catalog: &Catalog, year: i32, month: u32, day: u32) -> &DayNode {
    catalog.day(date(year, month, day)).unwrap_or_else(|| {
        let dates: Vec<String> = catalog.days().map(|(d, _)| d.to_string()).collect();
        panic!("day {year}-{month:02}-{day:02} not found. Available: {dates:?}")
    })
}

/// Years in catalog order.
pub fn year_keys(catalog: &Catalog) -> Vec<i32> {
    catalog.years().iter().map(|y| y.year()).collect()
}

/// Months of a year in catalog order. Panics if the year is missing.
pub fn month_keys(catalog: &Catalog, year: i32) -> Vec<u32> {
    catalog
        .years()
        .iter()
        .find(|y| y.year() == year)
        .map(|y| y.months().iter().map(|m| m.month()).collect())
        .unwrap_or_else(|| {
            let years = year_keys(catalog);
            panic!("year {year} not found. Available: {years:?}")
        })
}

/// Days of a month in catalog order. Panics if the month is missing.
pub fn day_keys(catalog: &Catalog, year: i32, month: u32) -> Vec<u32> {
    catalog
        .years()
        .iter()
        .find(|y| y.year() == year)
        .and_then(|y| y.months().iter().find(|m| m.month() == month))
        .map(|m| m.days().iter().map(|d| d.day()).collect())
        .unwrap_or_else(|| panic!("month {year}-{month:02} not found"))
}

/// Populated categories of a day in display order.
pub fn slot_categories(day: &DayNode) -> Vec<Category> {
    day.populated().map(|(c, _)| c).collect()
}

// =========================================================================
// In-memory store
// =========================================================================

/// Object store backed by a map, for tests that should not touch disk.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: RefCell<BTreeMap<String, (Vec<u8>, String)>>,
}

impl MemoryStore {
    /// A store holding empty objects under the given names.
    pub fn with_names(names: &[&str]) -> Self {
        let store = Self::default();
        for name in names {
            store
                .objects
                .borrow_mut()
                .insert(name.to_string(), (Vec::new(), String::new()));
        }
        store
    }

    /// Body and content type of a stored object. Panics if missing.
    pub fn get(&self, name: &str) -> (Vec<u8>, String) {
        self.objects
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("object '{name}' not in store"))
    }
}

impl ObjectStore for MemoryStore {
    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StoreError> {
        Ok(self
            .objects
            .borrow()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, (data, _))| ObjectInfo {
                name: name.clone(),
                size: data.len() as u64,
                checksum: None,
            })
            .collect())
    }

    fn put(&self, name: &str, data: &[u8], content_type: &str) -> Result<(), StoreError> {
        self.objects
            .borrow_mut()
            .insert(name.to_string(), (data.to_vec(), content_type.to_string()));
        Ok(())
    }
}

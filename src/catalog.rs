//! The archive catalog: a Year → Month → Day tree of stored objects.
//!
//! Records arrive in whatever order the storage listings return them, one
//! category at a time. Each record lands in the day node for its date, in the
//! slot for its category:
//!
//! ```text
//! Catalog
//! ├── 2023
//! │   └── December
//! │       └── 31   foundings
//! └── 2024
//!     └── January
//!         └── 5    nations, regions
//! ```
//!
//! ## Lookup and ordering
//!
//! Each level owns its children in a `Vec` and keeps a runtime map from the
//! numeric key (year, month or day) to the child's position. Nodes are created
//! lazily in arrival order, so after every feeding pass the tree is put through
//! a stabilization sort (days, then months, then years, all ascending) and the
//! position maps are re-derived. The sort runs even when input arrived sorted:
//! merged per-category listings interleave non-monotonically.
//!
//! Rendering walks the `Vec`s, never the maps, so output order is exactly the
//! sorted order. Both are private: every change goes through [`Catalog::insert`]
//! or [`Catalog::day_entry`], which keep the maps in step with the vectors.
//!
//! ## Duplicates
//!
//! A second record for the same (date, category) replaces the earlier slot.
//! Each pair maps to one stored object in practice; replacements are counted
//! in [`BuildStats::overwritten`] and reported, never treated as errors.

use crate::types::{CalendarDate, Category, ObjectRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

/// What a day holds for one category: where to fetch the archived object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Resolved access URL (never the raw object name).
    pub url: String,
    /// Object size in bytes, when the listing reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Hex SHA-256 of the object, when the listing reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl Slot {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: None,
            checksum: None,
        }
    }
}

/// Outcome of placing a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The slot was empty.
    Inserted,
    /// The slot already held an object and was replaced.
    Overwrote,
}

/// Counts from one or more feeding passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub inserted: usize,
    pub overwritten: usize,
}

impl BuildStats {
    fn record(&mut self, insertion: Insertion) {
        match insertion {
            Insertion::Inserted => self.inserted += 1,
            Insertion::Overwrote => self.overwritten += 1,
        }
    }

    /// Fold another pass's counts into this one.
    pub fn merge(&mut self, other: BuildStats) {
        self.inserted += other.inserted;
        self.overwritten += other.overwritten;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    years: Vec<YearNode>,
    /// Runtime index: year → position in `years`. Never serialized.
    #[serde(skip)]
    index: HashMap<i32, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearNode {
    year: i32,
    months: Vec<MonthNode>,
    #[serde(skip)]
    index: HashMap<u32, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthNode {
    month: u32,
    days: Vec<DayNode>,
    #[serde(skip)]
    index: HashMap<u32, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNode {
    day: u32,
    /// Populated slots, keyed and iterated in category display order.
    #[serde(default)]
    pub slots: BTreeMap<Category, Slot>,
}

// Equality ignores the runtime indexes, which are derived from the vectors.
impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.years == other.years
    }
}

impl Eq for Catalog {}

impl PartialEq for YearNode {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year && self.months == other.months
    }
}

impl Eq for YearNode {}

impl PartialEq for MonthNode {
    fn eq(&self, other: &Self) -> bool {
        self.month == other.month && self.days == other.days
    }
}

impl Eq for MonthNode {}

/// Find the node stored under `key`, appending a fresh one if absent.
fn locate_or_insert<'a, K, T>(
    nodes: &'a mut Vec<T>,
    index: &mut HashMap<K, usize>,
    key: K,
    make: impl FnOnce() -> T,
) -> &'a mut T
where
    K: Hash + Eq,
{
    let pos = *index.entry(key).or_insert_with(|| {
        nodes.push(make());
        nodes.len() - 1
    });
    &mut nodes[pos]
}

fn index_by<K, T>(nodes: &[T], key: impl Fn(&T) -> K) -> HashMap<K, usize>
where
    K: Hash + Eq,
{
    nodes.iter().enumerate().map(|(i, n)| (key(n), i)).collect()
}

/// Build a sorted catalog from one batch of records.
pub fn build<I>(entries: I) -> Catalog
where
    I: IntoIterator<Item = (ObjectRecord, Slot)>,
{
    let mut catalog = Catalog::new();
    catalog.extend(entries);
    catalog
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog saved by the scan stage and restore its indexes.
    ///
    /// Rejects duplicate sibling keys and days that are not calendar dates.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog
            .check_keys()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        catalog.stabilize();
        Ok(catalog)
    }

    fn check_keys(&self) -> Result<(), String> {
        let mut years = HashSet::new();
        for year in &self.years {
            if !years.insert(year.year) {
                return Err(format!("duplicate year {}", year.year));
            }
            let mut months = HashSet::new();
            for month in &year.months {
                if !(1..=12).contains(&month.month) {
                    return Err(format!("month {} of {} out of range", month.month, year.year));
                }
                if !months.insert(month.month) {
                    return Err(format!("duplicate month {}-{:02}", year.year, month.month));
                }
                let mut days = HashSet::new();
                for day in &month.days {
                    if CalendarDate::from_ymd(year.year, month.month, day.day).is_none() {
                        return Err(format!(
                            "{:04}-{:02}-{:02} is not a calendar date",
                            year.year, month.month, day.day
                        ));
                    }
                    if !days.insert(day.day) {
                        return Err(format!(
                            "duplicate day {:04}-{:02}-{:02}",
                            year.year, month.month, day.day
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Feed a batch of records, then stabilize.
    ///
    /// Feeding several batches into one catalog is equivalent to feeding
    /// their concatenation once.
    pub fn extend<I>(&mut self, entries: I) -> BuildStats
    where
        I: IntoIterator<Item = (ObjectRecord, Slot)>,
    {
        let mut stats = BuildStats::default();
        for (record, slot) in entries {
            stats.record(self.insert(&record, slot));
        }
        self.stabilize();
        stats
    }

    /// Place one record without re-sorting.
    ///
    /// Call [`Catalog::stabilize`] once all records are in.
    pub fn insert(&mut self, record: &ObjectRecord, slot: Slot) -> Insertion {
        match self.day_entry(record.date).slots.insert(record.category, slot) {
            Some(_) => Insertion::Overwrote,
            None => Insertion::Inserted,
        }
    }

    /// The day node for a date, created empty if absent.
    ///
    /// Like [`Catalog::insert`], leaves new nodes unsorted until the next
    /// [`Catalog::stabilize`].
    pub fn day_entry(&mut self, date: CalendarDate) -> &mut DayNode {
        let year = locate_or_insert(&mut self.years, &mut self.index, date.year(), || {
            YearNode::new(date.year())
        });
        let month = locate_or_insert(&mut year.months, &mut year.index, date.month(), || {
            MonthNode::new(date.month())
        });
        locate_or_insert(&mut month.days, &mut month.index, date.day(), || {
            DayNode::new(date.day())
        })
    }

    /// Sort every level ascending and re-derive the position indexes.
    pub fn stabilize(&mut self) {
        for year in &mut self.years {
            for month in &mut year.months {
                month.days.sort_by_key(|d| d.day);
                month.index = index_by(&month.days, |d| d.day);
            }
            year.months.sort_by_key(|m| m.month);
            year.index = index_by(&year.months, |m| m.month);
        }
        self.years.sort_by_key(|y| y.year);
        self.index = index_by(&self.years, |y| y.year);
    }

    /// The day node for a date, if any record mapped to it.
    pub fn day(&self, date: CalendarDate) -> Option<&DayNode> {
        let year = self.years.get(*self.index.get(&date.year())?)?;
        let month = year.months.get(*year.index.get(&date.month())?)?;
        month.days.get(*month.index.get(&date.day())?)
    }

    /// Years in catalog order.
    pub fn years(&self) -> &[YearNode] {
        &self.years
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn month_count(&self) -> usize {
        self.years.iter().map(|y| y.months.len()).sum()
    }

    pub fn day_count(&self) -> usize {
        self.days().count()
    }

    /// Number of populated (day, category) slots.
    pub fn slot_count(&self) -> usize {
        self.days().map(|(_, d)| d.slots.len()).sum()
    }

    /// Every day in catalog order with its date.
    pub fn days(&self) -> impl Iterator<Item = (CalendarDate, &DayNode)> {
        self.years.iter().flat_map(|y| {
            y.months.iter().flat_map(move |m| {
                m.days.iter().filter_map(move |d| {
                    CalendarDate::from_ymd(y.year, m.month, d.day).map(|date| (date, d))
                })
            })
        })
    }
}

impl YearNode {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            months: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn months(&self) -> &[MonthNode] {
        &self.months
    }

    /// Whether any day beneath this year has a populated slot.
    pub fn has_entries(&self) -> bool {
        self.months.iter().any(MonthNode::has_entries)
    }
}

impl MonthNode {
    pub fn new(month: u32) -> Self {
        Self {
            month,
            days: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> &[DayNode] {
        &self.days
    }

    pub fn has_entries(&self) -> bool {
        self.days.iter().any(|d| !d.is_empty())
    }
}

impl DayNode {
    pub fn new(day: u32) -> Self {
        Self {
            day,
            slots: BTreeMap::new(),
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn slot(&self, category: Category) -> Option<&Slot> {
        self.slots.get(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Populated slots in display order (nations, regions, foundings).
    pub fn populated(&self) -> impl Iterator<Item = (Category, &Slot)> {
        self.slots.iter().map(|(&c, s)| (c, s))
    }
}

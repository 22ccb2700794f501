//! Shared types used across the scan and generate stages.
//!
//! A stored object is identified by its category (which listing it came from)
//! and the UTC calendar date embedded in its name.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The dataset kinds the archive tracks.
///
/// Variant order is the display order on the catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nations,
    Regions,
    Foundings,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Nations, Category::Regions, Category::Foundings];

    /// Storage prefix every object of this category lives under.
    pub fn prefix(self) -> &'static str {
        match self {
            Category::Nations => "nations/",
            Category::Regions => "regions/",
            Category::Foundings => "foundings/",
        }
    }

    /// Lowercase label used in links and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Category::Nations => "nations",
            Category::Regions => "regions",
            Category::Foundings => "foundings",
        }
    }

    /// Filename suffix following the date, e.g. `-nations.xml.gz`.
    pub fn suffix(self) -> &'static str {
        match self {
            Category::Nations => "-nations.xml.gz",
            Category::Regions => "-regions.xml.gz",
            Category::Foundings => "-foundings.json",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A UTC calendar date with no time component.
///
/// Only constructible from a real date, so `month` is always `1..=12` and
/// `day` is valid for that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Build a date, returning `None` for anything that is not on the calendar
    /// (month 13, February 30th, ...).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A storage object name resolved to its category and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub name: String,
    pub category: Category,
    pub date: CalendarDate,
}

//! Object name parsing for the `<category>/YYYY-MM-DD-<category>.<ext>` convention.
//!
//! Every category has exactly one filename template:
//!
//! ```text
//! nations/YYYY-MM-DD-nations.xml.gz
//! regions/YYYY-MM-DD-regions.xml.gz
//! foundings/YYYY-MM-DD-foundings.json
//! ```
//!
//! The date is the fixed-width substring right after the category prefix.
//! Parsing is strict: the substring must be exactly `YYYY-MM-DD` with ASCII
//! digits, it must be a real calendar date, and the whole name must equal the
//! template filled in with that date. Dates are never clamped, so
//! `2024-02-30` is an error rather than March 1st.
//!
//! The category is never inferred from the name. Callers pass the category of
//! the listing the name came from.

use crate::types::{CalendarDate, Category, ObjectRecord};
use chrono::NaiveDate;
use thiserror::Error;

/// Width of the `YYYY-MM-DD` date field.
const DATE_WIDTH: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("Malformed record name {name:?}: {reason}")]
    MalformedRecordName { name: String, reason: String },
}

fn malformed(name: &str, reason: impl Into<String>) -> NameError {
    NameError::MalformedRecordName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Canonical object name for a category and date.
///
/// - `(Nations, 2024-01-05)` → `"nations/2024-01-05-nations.xml.gz"`
/// - `(Foundings, 2024-01-05)` → `"foundings/2024-01-05-foundings.json"`
pub fn object_name(category: Category, date: CalendarDate) -> String {
    format!("{}{}{}", category.prefix(), date, category.suffix())
}

/// Parse a stored object name against its category's template.
pub fn parse_object_name(name: &str, category: Category) -> Result<ObjectRecord, NameError> {
    let rest = name.strip_prefix(category.prefix()).ok_or_else(|| {
        malformed(
            name,
            format!("expected prefix {:?}", category.prefix()),
        )
    })?;

    let field = rest
        .get(..DATE_WIDTH)
        .ok_or_else(|| malformed(name, "name too short for a YYYY-MM-DD date"))?;
    let date = parse_date_field(field).map_err(|reason| malformed(name, reason))?;

    let expected = object_name(category, date);
    if expected != name {
        return Err(malformed(name, format!("expected {expected:?}")));
    }

    Ok(ObjectRecord {
        name: name.to_string(),
        category,
        date,
    })
}

/// Parse a strict `YYYY-MM-DD` field.
fn parse_date_field(field: &str) -> Result<CalendarDate, String> {
    let well_formed = field.len() == DATE_WIDTH
        && field.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(format!("{field:?} is not in YYYY-MM-DD form"));
    }

    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .map(CalendarDate::from)
        .map_err(|e| format!("{field:?} is not a calendar date: {e}"))
}

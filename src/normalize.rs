//! Order date normalization.
//!
//! `Order Date` arrives as free text. Each value is trimmed and parsed with a
//! month-first (US) interpretation; values that do not parse become null
//! rather than failing the load. Null-dated rows stay in the table but can
//! never satisfy a date-range filter.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::model::{Field, Table, TableResult, Value};

/// Date layouts tried in order. Two-digit years are tried before four-digit
/// ones because `%Y` would otherwise accept `16` as the year 16.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y", "%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y",
    "%b %d, %Y",
];

const TIME_SUFFIXES: &[&str] = &[" %H:%M:%S", " %H:%M", "T%H:%M:%S", " %I:%M:%S %p", " %I:%M %p"];

/// Inclusive range of the dates present in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Outcome of normalizing a table's order dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateReport {
    pub parsed: usize,
    pub failed: usize,
    /// `None` when no value parsed.
    pub bounds: Option<DateBounds>,
}

/// Parse one order date; `None` when the value is not a recognizable date.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATE_FORMATS {
        for suffix in TIME_SUFFIXES {
            let layout = format!("{format}{suffix}");
            if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, &layout) {
                return Some(stamp.date());
            }
        }
    }

    None
}

fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Date(date) => Value::Date(*date),
        Value::Text(text) => parse_order_date(text).map_or(Value::Null, Value::Date),
        Value::Number(_) | Value::Null => Value::Null,
    }
}

/// Replace the `Order Date` column with parsed dates.
///
/// Returns the new table together with parse counts and the min/max date,
/// which become the default bounds of a filter selection.
pub fn normalize_dates(table: &Table) -> TableResult<(Table, DateReport)> {
    let values: Vec<Value> = table
        .column(Field::OrderDate.name())?
        .map(normalize_value)
        .collect();

    let mut bounds: Option<DateBounds> = None;
    let mut parsed = 0;
    for date in values.iter().filter_map(Value::as_date) {
        parsed += 1;
        bounds = Some(match bounds {
            None => DateBounds {
                start: date,
                end: date,
            },
            Some(b) => DateBounds {
                start: b.start.min(date),
                end: b.end.max(date),
            },
        });
    }
    let failed = values.len() - parsed;

    if failed > 0 {
        log::warn!(
            "{} of {} order dates could not be parsed and will be excluded from date filters",
            failed,
            values.len()
        );
    }

    let normalized = table.replace_column(Field::OrderDate.name(), values)?;
    Ok((
        normalized,
        DateReport {
            parsed,
            failed,
            bounds,
        },
    ))
}

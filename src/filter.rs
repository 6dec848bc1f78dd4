//! Date-range and cascading geography filters.
//!
//! ```text
//! Table ──[date range]──▶ date-filtered ──[regions ∧ states ∧ cities]──▶ filtered
//! ```
//!
//! Both steps keep the surviving rows in source order. Geography is a single
//! predicate over three optional sets: an empty set places no constraint on
//! its dimension, and every non-empty set must contain the row's value.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Field, Table, TableResult, Value};
use crate::normalize::DateBounds;

/// Inclusive date range, compared on calendar dates only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl From<DateBounds> for DateRange {
    fn from(bounds: DateBounds) -> Self {
        Self::new(bounds.start, bounds.end)
    }
}

/// Selected regions, states and cities. Empty means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoSelection {
    pub regions: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
}

impl GeoSelection {
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions.extend(regions.into_iter().map(Into::into));
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities.extend(cities.into_iter().map(Into::into));
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty() && self.states.is_empty() && self.cities.is_empty()
    }

    /// The dimensions that actually constrain rows.
    fn constraints(&self) -> impl Iterator<Item = (Field, &BTreeSet<String>)> {
        [
            (Field::Region, &self.regions),
            (Field::State, &self.states),
            (Field::City, &self.cities),
        ]
        .into_iter()
        .filter(|(_, set)| !set.is_empty())
    }
}

/// Everything that narrows the table before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub dates: DateRange,
    pub geography: GeoSelection,
}

impl FilterSelection {
    pub fn new(dates: DateRange) -> Self {
        Self {
            dates,
            geography: GeoSelection::default(),
        }
    }

    pub fn with_geography(mut self, geography: GeoSelection) -> Self {
        self.geography = geography;
        self
    }
}

/// The two tables produced by the filter stage.
///
/// Rankings are computed over `date_filtered`; every other summary reads
/// `filtered`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTables {
    pub date_filtered: Table,
    pub filtered: Table,
}

/// Keep rows whose order date lies in `range`. Rows with a null date never match.
pub fn filter_by_date(table: &Table, range: &DateRange) -> TableResult<Table> {
    let index = table.field_index(Field::OrderDate)?;
    Ok(table.filter_rows(|row| row[index].as_date().is_some_and(|d| range.contains(d))))
}

/// Keep rows satisfying every non-empty geography set.
///
/// Only the dimensions that are selected are looked up, so a table without a
/// `City` column can still be filtered by region.
pub fn filter_by_geography(table: &Table, geography: &GeoSelection) -> TableResult<Table> {
    let predicates = geography
        .constraints()
        .map(|(field, set)| table.field_index(field).map(|index| (index, set)))
        .collect::<TableResult<Vec<_>>>()?;

    Ok(table.filter_rows(|row| {
        predicates
            .iter()
            .all(|(index, set)| is_member(&row[*index], set))
    }))
}

fn is_member(value: &Value, set: &BTreeSet<String>) -> bool {
    value.label().is_some_and(|label| set.contains(label.as_ref()))
}

/// Run both filter steps.
pub fn apply(table: &Table, selection: &FilterSelection) -> TableResult<FilteredTables> {
    let date_filtered = filter_by_date(table, &selection.dates)?;
    let filtered = filter_by_geography(&date_filtered, &selection.geography)?;
    log::debug!(
        "Filter kept {} of {} rows by date, {} after geography",
        date_filtered.len(),
        table.len(),
        filtered.len()
    );
    Ok(FilteredTables {
        date_filtered,
        filtered,
    })
}

/// Distinct values of a field in order of first appearance.
fn distinct(table: &Table, field: Field) -> TableResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for value in table.column(field.name())? {
        if let Some(label) = value.label() {
            if seen.insert(label.to_string()) {
                values.push(label.into_owned());
            }
        }
    }
    Ok(values)
}

/// Region choices offered for a (date-filtered) table.
pub fn region_options(table: &Table) -> TableResult<Vec<String>> {
    distinct(table, Field::Region)
}

/// State choices, narrowed by the selected regions.
pub fn state_options(table: &Table, regions: &BTreeSet<String>) -> TableResult<Vec<String>> {
    let pool = GeoSelection {
        regions: regions.clone(),
        ..GeoSelection::default()
    };
    distinct(&filter_by_geography(table, &pool)?, Field::State)
}

/// City choices, narrowed by the selected regions and states.
pub fn city_options(
    table: &Table,
    regions: &BTreeSet<String>,
    states: &BTreeSet<String>,
) -> TableResult<Vec<String>> {
    let pool = GeoSelection {
        regions: regions.clone(),
        states: states.clone(),
        cities: BTreeSet::new(),
    };
    distinct(&filter_by_geography(table, &pool)?, Field::City)
}

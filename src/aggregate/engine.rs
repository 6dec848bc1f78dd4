//! Generic evaluation of summary definitions.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{Condition, Measure, Registry, Scope, SortDirection, SortItem, Summary, SummaryDef};
use crate::filter::FilteredTables;
use crate::model::{Table, TableResult, Value};

/// Evaluate one definition against a table.
pub fn evaluate(def: &SummaryDef, table: &Table) -> TableResult<Table> {
    let mut result = apply_conditions(table, &def.filters)?;

    if !def.group.is_empty() {
        result = group(&result, def)?;
    }
    if !def.having.is_empty() {
        result = apply_conditions(&result, &def.having)?;
    }
    if let Some(sort) = &def.sort {
        result = sort_rows(result, sort)?;
    }
    if let Some(limit) = def.limit {
        result = result.head(limit);
    }
    if !def.project.is_empty() {
        result = result.select(&def.project)?;
    }

    Ok(result)
}

/// Evaluate a definition against the table its scope names.
pub fn run(def: &SummaryDef, tables: &FilteredTables) -> TableResult<Summary> {
    let source = match def.scope {
        Scope::Filtered => &tables.filtered,
        Scope::DateOnly => &tables.date_filtered,
    };
    let table = evaluate(def, source)?;
    log::debug!("Summary '{}': {} rows", def.name, table.len());
    Ok(Summary::from_table(def, table))
}

/// Evaluate every definition in the registry.
///
/// Each summary succeeds or fails on its own; a column missing for one
/// summary does not prevent the others from being computed.
pub fn run_all<'r>(
    registry: &'r Registry,
    tables: &FilteredTables,
) -> Vec<(&'r SummaryDef, TableResult<Summary>)> {
    registry
        .iter()
        .map(|def| (def, run(def, tables)))
        .collect()
}

fn apply_conditions(table: &Table, conditions: &[Condition]) -> TableResult<Table> {
    let resolved = conditions
        .iter()
        .map(|c| table.column_index(&c.column).map(|index| (index, c)))
        .collect::<TableResult<Vec<_>>>()?;

    Ok(table.filter_rows(|row| {
        resolved
            .iter()
            .all(|(index, condition)| condition.holds(&row[*index]))
    }))
}

/// Group key ordered with [`Value::total_cmp`], so groups come out sorted.
struct GroupKey(Vec<Value>);

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| self.0.len().cmp(&other.0.len()))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for GroupKey {}

/// Group rows by the definition's keys and accumulate its measures.
///
/// Rows with a null key are left out of the grouping; null or non-numeric
/// measure cells add nothing to a sum.
fn group(table: &Table, def: &SummaryDef) -> TableResult<Table> {
    let keys = def
        .group
        .iter()
        .map(|field| table.field_index(*field))
        .collect::<TableResult<Vec<_>>>()?;
    let measures = def
        .show
        .iter()
        .map(|measure| match measure {
            Measure::Sum(field) => table.field_index(*field).map(Some),
            Measure::Count => Ok(None),
        })
        .collect::<TableResult<Vec<_>>>()?;

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        let key: Vec<Value> = keys.iter().map(|&i| row[i].clone()).collect();
        if key.iter().any(Value::is_null) {
            continue;
        }
        let totals = groups
            .entry(GroupKey(key))
            .or_insert_with(|| vec![0.0; measures.len()]);
        for (total, measure) in totals.iter_mut().zip(&measures) {
            match measure {
                Some(index) => *total += row[*index].as_f64().unwrap_or(0.0),
                None => *total += 1.0,
            }
        }
    }

    let columns = def
        .group
        .iter()
        .map(|field| field.name().to_string())
        .chain(def.show.iter().map(|m| m.column_name().to_string()))
        .collect();
    let rows = groups
        .into_iter()
        .map(|(GroupKey(mut row), totals)| {
            row.extend(totals.into_iter().map(Value::Number));
            row
        })
        .collect();

    Table::from_rows(columns, rows)
}

fn sort_rows(table: Table, sort: &SortItem) -> TableResult<Table> {
    let index = table.column_index(&sort.column)?;
    let (columns, mut rows) = table.into_parts();
    rows.sort_by(|a, b| compare(&a[index], &b[index], sort.direction));
    Table::from_rows(columns, rows)
}

/// Sorts are on measures: cells without a numeric value sort last in
/// either direction, in input order.
fn compare(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.total_cmp(&y),
            SortDirection::Desc => y.total_cmp(&x),
        },
    }
}

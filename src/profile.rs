//! Dataset overview views: columns, types, nulls, statistics, correlations.

use serde::Serialize;

use crate::model::{Table, Value, ValueKind};

pub const ABOUT: &str = "This dataset contains Super Store sales transactions: customer, \
product, profit, discount and delivery details for every order line. Use the date range and \
the Region / State / City filters to narrow the summaries.";

/// The overview views a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    About,
    Dataset,
    Columns,
    DataTypes,
    NullValues,
    SummaryStatistics,
    CorrelationMatrix,
}

impl View {
    pub const ALL: [View; 7] = [
        View::About,
        View::Dataset,
        View::Columns,
        View::DataTypes,
        View::NullValues,
        View::SummaryStatistics,
        View::CorrelationMatrix,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::About => "About Data",
            View::Dataset => "Show Dataset",
            View::Columns => "Show Columns",
            View::DataTypes => "Show Data Types",
            View::NullValues => "Show Null Values",
            View::SummaryStatistics => "Show Summary Statistics",
            View::CorrelationMatrix => "Show Correlation Matrix",
        }
    }
}

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Number,
    Text,
    Date,
    /// More than one non-null kind.
    Mixed,
    /// Only nulls.
    Empty,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Mixed => "mixed",
            ColumnType::Empty => "empty",
        }
    }
}

fn column_type(table: &Table, index: usize) -> ColumnType {
    let mut seen: Option<ValueKind> = None;
    for row in table.rows() {
        let kind = row[index].kind();
        if kind == ValueKind::Null {
            continue;
        }
        match seen {
            None => seen = Some(kind),
            Some(previous) if previous != kind => return ColumnType::Mixed,
            Some(_) => {}
        }
    }
    match seen {
        None | Some(ValueKind::Null) => ColumnType::Empty,
        Some(ValueKind::Number) => ColumnType::Number,
        Some(ValueKind::Text) => ColumnType::Text,
        Some(ValueKind::Date) => ColumnType::Date,
    }
}

fn numeric_columns(table: &Table) -> Vec<usize> {
    (0..table.width())
        .filter(|&i| column_type(table, i) == ColumnType::Number)
        .collect()
}

fn numbers(table: &Table, index: usize) -> Vec<f64> {
    table.rows().iter().filter_map(|r| r[index].as_f64()).collect()
}

fn build(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Table {
    Table::from_rows(columns, rows).unwrap_or_default()
}

/// One row per column: its name.
pub fn columns(table: &Table) -> Table {
    build(
        vec!["Column".to_string()],
        table.columns().iter().map(|c| vec![Value::text(c.as_str())]).collect(),
    )
}

/// One row per column: its inferred type.
pub fn data_types(table: &Table) -> Table {
    build(
        vec!["Column".to_string(), "Type".to_string()],
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| vec![Value::text(c.as_str()), Value::text(column_type(table, i).name())])
            .collect(),
    )
}

/// One row per column: how many cells are null.
pub fn null_counts(table: &Table) -> Table {
    build(
        vec!["Column".to_string(), "Nulls".to_string()],
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let nulls = table.rows().iter().filter(|r| r[i].is_null()).count();
                vec![Value::text(c.as_str()), Value::Number(nulls as f64)]
            })
            .collect(),
    )
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Count, mean, std, min, quartiles and max of each numeric column.
///
/// Statistics are rows and numeric columns are columns.
pub fn summary_statistics(table: &Table) -> Table {
    let numeric = numeric_columns(table);
    let mut columns = vec!["Statistic".to_string()];
    columns.extend(numeric.iter().map(|&i| table.columns()[i].clone()));

    let stats: Vec<Vec<f64>> = numeric
        .iter()
        .map(|&i| {
            let mut values = numbers(table, i);
            values.sort_by(f64::total_cmp);
            vec![
                values.len() as f64,
                mean(&values),
                std_dev(&values),
                values.first().copied().unwrap_or(f64::NAN),
                quantile(&values, 0.25),
                quantile(&values, 0.5),
                quantile(&values, 0.75),
                values.last().copied().unwrap_or(f64::NAN),
            ]
        })
        .collect();

    let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let rows = labels
        .iter()
        .enumerate()
        .map(|(s, label)| {
            let mut row = vec![Value::text(*label)];
            row.extend(stats.iter().map(|column| Value::Number(column[s])));
            row
        })
        .collect();

    build(columns, rows)
}

/// Pearson correlation over rows where both cells are numbers.
fn pearson(table: &Table, a: usize, b: usize) -> f64 {
    let pairs: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .filter_map(|r| Some((r[a].as_f64()?, r[b].as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Square correlation matrix of the numeric columns.
pub fn correlation_matrix(table: &Table) -> Table {
    let numeric = numeric_columns(table);
    let mut columns = vec![String::new()];
    columns.extend(numeric.iter().map(|&i| table.columns()[i].clone()));

    let rows = numeric
        .iter()
        .map(|&a| {
            let mut row = vec![Value::text(table.columns()[a].as_str())];
            row.extend(numeric.iter().map(|&b| Value::Number(pearson(table, a, b))));
            row
        })
        .collect();

    build(columns, rows)
}

/// The table a view shows; `About` has none.
pub fn view(table: &Table, view: View) -> Option<Table> {
    match view {
        View::About => None,
        View::Dataset => Some(table.clone()),
        View::Columns => Some(columns(table)),
        View::DataTypes => Some(data_types(table)),
        View::NullValues => Some(null_counts(table)),
        View::SummaryStatistics => Some(summary_statistics(table)),
        View::CorrelationMatrix => Some(correlation_matrix(table)),
    }
}

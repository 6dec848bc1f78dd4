// src/model/table.rs
use crate::model::field::Field;
use crate::model::value::Value;
use serde::Serialize;

/// Errors raised when a stage references the shape of a table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

pub type TableResult<T> = Result<T, TableError>;

/// An ordered sequence of rows sharing one set of named columns.
///
/// Every stage of the pipeline produces a new `Table` from its input; a
/// table is never mutated once it has been handed to another stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row against the header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> TableResult<Self> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidth {
                    row: index,
                    found: row.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column, or `MissingField` when the table lacks it.
    pub fn column_index(&self, name: &str) -> TableResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingField(name.to_string()))
    }

    pub fn field_index(&self, field: Field) -> TableResult<usize> {
        self.column_index(field.name())
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> TableResult<impl Iterator<Item = &Value> + '_> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(move |values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// Keep the rows matching `predicate`, preserving their relative order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Project onto the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> TableResult<Table> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n.as_ref()))
            .collect::<TableResult<Vec<_>>>()?;
        Ok(Table {
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// A copy of this table with one column's values replaced.
    pub fn replace_column(&self, name: &str, values: Vec<Value>) -> TableResult<Table> {
        let index = self.column_index(name)?;
        if values.len() != self.rows.len() {
            return Err(TableError::RowWidth {
                row: values.len().min(self.rows.len()),
                found: values.len(),
                expected: self.rows.len(),
            });
        }
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row[index] = value;
                row
            })
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Sum of the numeric values of a column; non-numeric cells are skipped.
    pub fn sum(&self, name: &str) -> TableResult<f64> {
        Ok(self.column(name)?.filter_map(Value::as_f64).sum())
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

/// A borrowed view of one row that resolves cells by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| &self.values[i])
    }

    pub fn field(&self, field: Field) -> Option<&'a Value> {
        self.get(field.name())
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

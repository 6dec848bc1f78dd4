//! Spreadsheet reader (xlsx / xlsm / xls / ods) backed by calamine.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::{LoadError, LoadResult};
use crate::model::{Table, Value};

/// Read the first worksheet of a workbook. The first row is the header.
pub fn read_spreadsheet(data: Vec<u8>) -> LoadResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(LoadError::NoWorksheet),
    };

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Table::default()),
    };

    let body = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .collect();

    Ok(Table::from_rows(columns, body)?)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::infer(s),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::text(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::Date(d.date()))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::text(s.clone()),
    }
}

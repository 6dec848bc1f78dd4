//! CSV export of summaries.
//!
//! Output is comma-separated with a header row of column names and one line
//! per row. Numbers use the shortest representation that reads back to the
//! same value, dates are `YYYY-MM-DD`, nulls are empty fields.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};

use crate::aggregate::Summary;
use crate::loader::{read_csv, LoadError};
use crate::model::{Field, Table, TableError};
use crate::normalize::normalize_dates;

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Value {value:?} in column '{column}' cannot be represented in {encoding}")]
    Encoding {
        column: String,
        value: String,
        encoding: String,
    },

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Serialize a table as UTF-8 CSV text.
pub fn to_csv_string(table: &Table) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Read an exported CSV back into a table.
///
/// Cells are inferred the way the loader infers them, and an `Order Date`
/// column is parsed back into dates.
pub fn read_exported(data: &[u8], encoding: &str) -> ExportResult<Table> {
    let table = read_csv(data, b',', encoding)?;
    if !table.has_column(Field::OrderDate.name()) {
        return Ok(table);
    }
    let (table, _) = normalize_dates(&table)?;
    Ok(table)
}

/// Serialize a table as CSV bytes in the given encoding.
///
/// Every header and cell is checked first, so the error names the column of
/// the first field the target encoding cannot represent.
pub fn to_csv_bytes(table: &Table, encoding: &str) -> ExportResult<Vec<u8>> {
    let target = Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| ExportError::UnknownEncoding(encoding.to_string()))?
        .output_encoding();

    let text = to_csv_string(table)?;
    if target == UTF_8 {
        return Ok(text.into_bytes());
    }

    for column in table.columns() {
        check_encodable(target, column, column)?;
    }
    for row in table.rows() {
        for (column, value) in table.columns().iter().zip(row) {
            check_encodable(target, column, &value.to_string())?;
        }
    }

    let (bytes, _, _) = target.encode(&text);
    Ok(bytes.into_owned())
}

fn check_encodable(target: &'static Encoding, column: &str, text: &str) -> ExportResult<()> {
    let (_, _, had_errors) = target.encode(text);
    if had_errors {
        return Err(ExportError::Encoding {
            column: column.to_string(),
            value: text.to_string(),
            encoding: target.name().to_string(),
        });
    }
    Ok(())
}

/// Write one summary into `dir` under its export file name.
///
/// Summaries with no data are skipped and return `None`.
pub fn write_summary(summary: &Summary, dir: &Path, encoding: &str) -> ExportResult<Option<PathBuf>> {
    let Some(table) = summary.table() else {
        log::info!("Skipping export of '{}': no data", summary.name);
        return Ok(None);
    };

    let bytes = to_csv_bytes(table, encoding)?;
    let path = dir.join(&summary.file_name);
    fs::write(&path, bytes)?;
    log::info!("Exported '{}' to {}", summary.name, path.display());
    Ok(Some(path))
}

/// Write every summary that has data, creating `dir` if needed.
pub fn export_all<'a, I>(summaries: I, dir: &Path, encoding: &str) -> ExportResult<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a Summary>,
{
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for summary in summaries {
        if let Some(path) = write_summary(summary, dir, encoding)? {
            written.push(path);
        }
    }
    Ok(written)
}

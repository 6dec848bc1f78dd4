//! Dataset loading.
//!
//! Turns a file on disk, or an uploaded byte buffer with its file name, into
//! a [`Table`]. The format is chosen from the file extension:
//!
//! | Extension            | Reader                        |
//! |----------------------|-------------------------------|
//! | `csv`, `txt`         | comma-delimited text          |
//! | `tsv`                | tab-delimited text            |
//! | `xlsx`, `xlsm`, `xls`, `ods` | first worksheet       |
//!
//! Required columns are not checked here; a missing column surfaces as
//! [`TableError::MissingField`](crate::model::TableError) at the first stage
//! that references it.

mod delimited;
mod spreadsheet;

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Table, TableError};

pub use self::delimited::{decode_text, read_csv};
pub use self::spreadsheet::read_spreadsheet;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Unsupported file format: '{0}' (expected csv, tsv, txt, xlsx, xlsm, xls or ods)")]
    UnsupportedFormat(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// How a file's bytes are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Delimited { delimiter: u8 },
    Spreadsheet,
}

impl Format {
    /// Pick a format from a bare extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> LoadResult<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Ok(Format::Delimited { delimiter: b',' }),
            "tsv" => Ok(Format::Delimited { delimiter: b'\t' }),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Format::Spreadsheet),
            _ => Err(LoadError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Pick a format from a file name or path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LoadResult<Format> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Format::from_extension(ext)
    }
}

/// Where a dataset comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// A file on disk.
    Path(PathBuf),
    /// An uploaded file: its declared name and contents.
    Upload { name: String, data: Vec<u8> },
}

impl DatasetSource {
    /// The name used to pick a format.
    pub fn name(&self) -> String {
        match self {
            DatasetSource::Path(path) => path.display().to_string(),
            DatasetSource::Upload { name, .. } => name.clone(),
        }
    }
}

/// Options for reading text-based formats.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Encoding label for delimited text (any WHATWG label, e.g. `utf-8`,
    /// `latin1`, `windows-1252`).
    pub encoding: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
        }
    }
}

impl LoadOptions {
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }
}

/// Load a dataset from any source.
///
/// The format is validated before any bytes are read, so an unsupported
/// extension never touches the filesystem.
pub fn load(source: DatasetSource, options: &LoadOptions) -> LoadResult<Table> {
    let name = source.name();
    let format = match &source {
        DatasetSource::Path(path) => Format::from_path(path)?,
        DatasetSource::Upload { name, .. } => Format::from_path(name)?,
    };

    let data = match source {
        DatasetSource::Path(path) => fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?,
        DatasetSource::Upload { data, .. } => data,
    };

    let table = match format {
        Format::Delimited { delimiter } => read_csv(&data, delimiter, &options.encoding)?,
        Format::Spreadsheet => read_spreadsheet(data)?,
    };

    log::info!(
        "Loaded '{}': {} rows, {} columns",
        name,
        table.len(),
        table.width()
    );
    Ok(table)
}

/// Load a dataset from a path with default options.
pub fn load_path<P: AsRef<Path>>(path: P) -> LoadResult<Table> {
    load(
        DatasetSource::Path(path.as_ref().to_path_buf()),
        &LoadOptions::default(),
    )
}

//! Delimited text (CSV / TSV) reader.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use super::{LoadError, LoadResult};
use crate::model::{Table, Value};

/// Decode raw file bytes into text.
///
/// A leading BOM always wins. For UTF-8, bytes that are not valid UTF-8 are
/// re-decoded as Windows-1252 (a superset of ISO-8859-1, which is what
/// Superstore exports are usually saved as).
pub fn decode_text<'a>(data: &'a [u8], label: &str) -> LoadResult<Cow<'a, str>> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))?;

    if let Some((bom_encoding, bom_len)) = Encoding::for_bom(data) {
        let (text, _) = bom_encoding.decode_without_bom_handling(&data[bom_len..]);
        return Ok(text);
    }

    if encoding == UTF_8 {
        if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(data) {
            return Ok(text);
        }
        log::warn!("Input is not valid UTF-8; decoding as windows-1252");
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(data);
        return Ok(text);
    }

    let (text, had_errors) = encoding.decode_without_bom_handling(data);
    if had_errors {
        log::warn!(
            "Input contains bytes that are invalid in {}; replaced",
            encoding.name()
        );
    }
    Ok(text)
}

/// Read a delimited text file with a header row.
///
/// Ragged records are padded with nulls or truncated to the header width.
pub fn read_csv(data: &[u8], delimiter: u8, encoding: &str) -> LoadResult<Table> {
    let text = decode_text(data, encoding)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for result in reader.records() {
        let record = result?;
        if record.len() != width {
            ragged += 1;
        }
        let mut row: Vec<Value> = record.iter().take(width).map(Value::infer).collect();
        row.resize(width, Value::Null);
        rows.push(row);
    }

    if ragged > 0 {
        log::warn!(
            "{} record(s) did not have {} fields and were padded or truncated",
            ragged,
            width
        );
    }

    Ok(Table::from_rows(columns, rows)?)
}

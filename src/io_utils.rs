//! CSV reader construction, delimiter resolution, and field decoding.
//!
//! The source file is always read as raw bytes and decoded field by field so
//! that non UTF-8 inputs can be loaded through `--input-encoding`.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Resolves an encoding label. Only ASCII-compatible encodings are accepted,
/// since records are split on single-byte delimiters before fields are decoded.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    let Some(value) = label else {
        return Ok(UTF_8);
    };
    let encoding = Encoding::for_label(value.trim().as_bytes())
        .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))?;
    if !encoding.is_ascii_compatible() {
        bail!(
            "Encoding '{}' is not ASCII-compatible and cannot be read as delimited text",
            encoding.name()
        );
    }
    Ok(encoding)
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Builds a header-aware reader. Short rows are tolerated here and padded with
/// missing values by the chunk reader; long rows are rejected there.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    Ok(open_csv_reader(BufReader::new(file), delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Returns the decoded header row, or `None` when the input has no header at all.
pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Option<Vec<String>>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    if headers.is_empty() {
        return Ok(None);
    }
    decode_record(&headers, encoding).map(Some)
}

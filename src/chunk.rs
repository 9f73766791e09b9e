use std::io::Read;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{error::IngestError, io_utils};

/// Field values the usual dataframe readers treat as missing.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

/// A bounded batch of rows stored column by column; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    pub columns: Vec<Vec<Option<String>>>,
    pub rows: usize,
}

impl Chunk {
    fn with_columns(width: usize, capacity: usize) -> Self {
        Self {
            columns: (0..width).map(|_| Vec::with_capacity(capacity)).collect(),
            rows: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.columns[index].iter().map(|value| value.as_deref())
    }

    fn push_row(&mut self, fields: Vec<String>) {
        let mut fields = fields.into_iter();
        for column in &mut self.columns {
            let value = fields.next().filter(|field| !is_missing(field));
            column.push(value);
        }
        self.rows += 1;
    }
}

/// Streams a CSV reader as chunks of at most `chunk_size` rows.
pub struct ChunkReader<R: Read> {
    reader: csv::Reader<R>,
    encoding: &'static Encoding,
    width: usize,
    chunk_size: usize,
    record: csv::ByteRecord,
    exhausted: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(
        reader: csv::Reader<R>,
        encoding: &'static Encoding,
        width: usize,
        chunk_size: usize,
    ) -> Self {
        Self {
            reader,
            encoding,
            width,
            chunk_size: chunk_size.max(1),
            record: csv::ByteRecord::new(),
            exhausted: false,
        }
    }

    /// Reads the next chunk, or `None` once the input is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.exhausted {
            return Ok(None);
        }
        let mut chunk = Chunk::with_columns(self.width, self.chunk_size.min(8192));
        while chunk.rows < self.chunk_size {
            if !self.reader.read_byte_record(&mut self.record)? {
                self.exhausted = true;
                break;
            }
            let line = self
                .record
                .position()
                .map(|pos| pos.line())
                .unwrap_or_default();
            if self.record.len() > self.width {
                return Err(IngestError::RaggedRow {
                    row: line,
                    expected: self.width,
                    found: self.record.len(),
                }
                .into());
            }
            let fields = io_utils::decode_record(&self.record, self.encoding)
                .with_context(|| format!("Decoding row on line {line}"))?;
            chunk.push_row(fields);
        }
        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}

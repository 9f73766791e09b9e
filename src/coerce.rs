use std::fmt;

use log::debug;

use crate::{chunk::Chunk, detect::NumericDetector};

/// Declared storage type of a destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAffinity {
    Integer,
    Real,
    Text,
}

impl ColumnAffinity {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnAffinity::Integer => "INTEGER",
            ColumnAffinity::Real => "REAL",
            ColumnAffinity::Text => "TEXT",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnAffinity::Text)
    }
}

impl fmt::Display for ColumnAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl rusqlite::ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::{ToSqlOutput, ValueRef};
        Ok(match self {
            CellValue::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            CellValue::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            CellValue::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            CellValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Best-effort numeric parse; anything that is not a finite number becomes `Null`.
pub fn coerce_numeric(value: &str) -> CellValue {
    let trimmed = value.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return CellValue::Integer(int);
    }
    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => CellValue::Real(float),
        _ => CellValue::Null,
    }
}

/// A chunk after coercion, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedChunk {
    pub affinities: Vec<ColumnAffinity>,
    pub columns: Vec<Vec<CellValue>>,
    pub rows: usize,
}

impl TypedChunk {
    pub fn row(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.columns.iter().map(move |column| &column[index])
    }
}

/// True when the column has at least one value and every value parses as a
/// finite number, in any spelling `f64` accepts (`1.5e-05`, `.5`, `1.`).
pub fn is_already_numeric(chunk: &Chunk, index: usize) -> bool {
    let mut values = chunk.column(index).flatten().peekable();
    values.peek().is_some() && values.all(|value| coerce_numeric(value) != CellValue::Null)
}

/// Decides per column whether the chunk should be coerced to numbers.
/// Columns that are numeric throughout skip the sample heuristic.
pub fn classify_chunk(chunk: &Chunk, detector: &NumericDetector) -> Vec<bool> {
    (0..chunk.columns.len())
        .map(|idx| is_already_numeric(chunk, idx) || detector.looks_numeric(chunk.column(idx)))
        .collect()
}

/// Applies a numeric/text decision to every column of the chunk.
pub fn coerce_chunk(chunk: Chunk, numeric: &[bool]) -> TypedChunk {
    let rows = chunk.rows;
    let mut affinities = Vec::with_capacity(chunk.columns.len());
    let mut columns = Vec::with_capacity(chunk.columns.len());
    for (idx, column) in chunk.columns.into_iter().enumerate() {
        if numeric.get(idx).copied().unwrap_or(false) {
            let values = column
                .iter()
                .map(|value| value.as_deref().map_or(CellValue::Null, coerce_numeric))
                .collect::<Vec<_>>();
            let affinity = numeric_affinity(&values);
            debug!("Column #{idx} coerced to {affinity}");
            affinities.push(affinity);
            columns.push(values);
        } else {
            affinities.push(ColumnAffinity::Text);
            columns.push(
                column
                    .into_iter()
                    .map(|value| value.map_or(CellValue::Null, CellValue::Text))
                    .collect(),
            );
        }
    }
    TypedChunk {
        affinities,
        columns,
        rows,
    }
}

fn numeric_affinity(values: &[CellValue]) -> ColumnAffinity {
    if values.iter().any(|value| matches!(value, CellValue::Real(_))) {
        ColumnAffinity::Real
    } else {
        ColumnAffinity::Integer
    }
}

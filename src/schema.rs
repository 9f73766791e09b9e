use std::collections::HashSet;

use itertools::Itertools;

use crate::{coerce::ColumnAffinity, error::IngestError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub affinity: ColumnAffinity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(table: &str, names: &[String], affinities: &[ColumnAffinity]) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(idx, name)| ColumnDef {
                name: name.clone(),
                affinity: affinities.get(idx).copied().unwrap_or(ColumnAffinity::Text),
            })
            .collect();
        Self {
            table: table.to_string(),
            columns,
        }
    }

    /// Schema for an input with a header but no rows.
    pub fn all_text(table: &str, names: &[String]) -> Self {
        Self::new(table, names, &[])
    }

    pub fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.affinity.as_sql()))
            .join(", ");
        format!(
            "CREATE TABLE {} ({columns})",
            quote_identifier(&self.table)
        )
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_identifier(&self.table))
    }

    pub fn insert_sql(&self) -> String {
        let names = self
            .columns
            .iter()
            .map(|c| quote_identifier(&c.name))
            .join(", ");
        let placeholders = (1..=self.columns.len()).map(|i| format!("?{i}")).join(", ");
        format!(
            "INSERT INTO {} ({names}) VALUES ({placeholders})",
            quote_identifier(&self.table)
        )
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn validate_table_name(name: &str) -> Result<(), IngestError> {
    if name.trim().is_empty() || name.contains('\0') {
        return Err(IngestError::InvalidTableName(name.to_string()));
    }
    Ok(())
}

/// Names blank headers `Unnamed: <index>` and suffixes repeats with `.1`, `.2`, ...
/// Repeats are detected ASCII case-insensitively, as SQLite compares column names.
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut normalized = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.clone()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate.to_ascii_lowercase()) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.to_ascii_lowercase());
        normalized.push(candidate);
    }
    normalized
}

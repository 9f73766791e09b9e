use std::{fmt::Write as _, path::PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::store::StoredColumn;

/// End-of-run report, read back from the database rather than trusted from the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub database: PathBuf,
    pub table: String,
    pub stored_rows: u64,
    pub streamed_rows: u64,
    pub chunks: usize,
    pub columns: Vec<StoredColumn>,
}

impl LoadSummary {
    pub fn render_text(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Created {} with table '{}'.",
            self.database.display(),
            self.table
        );
        let _ = writeln!(
            output,
            "Imported rows: {} (from streaming total {}).",
            self.stored_rows, self.streamed_rows
        );
        let _ = writeln!(output, "Columns:");
        for column in &self.columns {
            let _ = writeln!(output, "  - {}: {}", column.name, column.declared_type);
        }
        output
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing load summary")
    }
}

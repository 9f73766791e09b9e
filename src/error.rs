use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV not found at {}", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("CSV at {} has no header row", .path.display())]
    MissingHeader { path: PathBuf },
    #[error("Row {row} has {found} field(s) but the header declares {expected}")]
    RaggedRow {
        row: u64,
        expected: usize,
        found: usize,
    },
    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),
}

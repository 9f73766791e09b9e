#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_ingest::cli::Cli;
use rusqlite::Connection;
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Load arguments reading `input` into `plays.db` inside the workspace.
    pub fn args(&self, input: &Path) -> Cli {
        Cli {
            input: input.to_path_buf(),
            database: self.path().join("plays.db"),
            ..Cli::default()
        }
    }
}

/// Declared column types as `(name, type)` pairs.
pub fn declared_types(db: &Path, table: &str) -> Vec<(String, String)> {
    let conn = Connection::open(db).expect("open database");
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info(\"{table}\")"))
        .expect("prepare pragma");
    stmt.query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
        .expect("query pragma")
        .collect::<rusqlite::Result<Vec<_>>>()
        .expect("read pragma rows")
}

/// Storage class of every value in `column`, in rowid order.
pub fn storage_classes(db: &Path, table: &str, column: &str) -> Vec<String> {
    let conn = Connection::open(db).expect("open database");
    let mut stmt = conn
        .prepare(&format!(
            "SELECT typeof(\"{column}\") FROM \"{table}\" ORDER BY rowid"
        ))
        .expect("prepare typeof");
    stmt.query_map([], |row| row.get(0))
        .expect("query typeof")
        .collect::<rusqlite::Result<Vec<_>>>()
        .expect("read typeof rows")
}

/// Builds a CSV body with a header and `rows` generated lines.
pub fn csv_with_rows(header: &str, rows: usize, line: impl Fn(usize) -> String) -> String {
    let mut body = String::from(header);
    body.push('\n');
    for idx in 0..rows {
        body.push_str(&line(idx));
        body.push('\n');
    }
    body
}

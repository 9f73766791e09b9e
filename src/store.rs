use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, params_from_iter};
use serde::Serialize;

use crate::{
    coerce::TypedChunk,
    schema::{TableSchema, quote_identifier},
};

const SIDECAR_SUFFIXES: &[&str] = &["-journal", "-wal", "-shm"];

/// One row of `PRAGMA table_info` reduced to what the summary needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
}

/// Exclusive owner of the destination connection; dropping it closes the database.
pub struct Destination {
    path: PathBuf,
    conn: Connection,
}

impl Destination {
    /// Deletes any previous database at `path` and opens an empty one.
    pub fn recreate(path: &Path) -> Result<Self> {
        remove_if_exists(path)?;
        for suffix in SIDECAR_SUFFIXES {
            let mut sidecar = path.as_os_str().to_owned();
            sidecar.push(suffix);
            remove_if_exists(Path::new(&sidecar))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Opening SQLite database {path:?}"))?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn create_table(&mut self, schema: &TableSchema) -> Result<()> {
        let create = schema.create_sql();
        debug!("{create}");
        let tx = self.conn.transaction()?;
        tx.execute(&schema.drop_sql(), [])
            .with_context(|| format!("Dropping table '{}'", schema.table))?;
        tx.execute(&create, [])
            .with_context(|| format!("Creating table '{}'", schema.table))?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts every row of the chunk in a single transaction.
    pub fn append_chunk(&mut self, schema: &TableSchema, chunk: &TypedChunk) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx
                .prepare_cached(&schema.insert_sql())
                .with_context(|| format!("Preparing insert into '{}'", schema.table))?;
            for row in 0..chunk.rows {
                stmt.execute(params_from_iter(chunk.row(row)))
                    .with_context(|| format!("Inserting row {} of chunk", row + 1))?;
            }
        }
        tx.commit()
            .with_context(|| format!("Committing chunk into '{}'", schema.table))?;
        Ok(chunk.rows)
    }

    pub fn row_count(&self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .with_context(|| format!("Counting rows in '{table}'"))?;
        Ok(count as u64)
    }

    pub fn table_info(&self, table: &str) -> Result<Vec<StoredColumn>> {
        let sql = format!("PRAGMA table_info({})", quote_identifier(table));
        let mut stmt = self.conn.prepare(&sql)?;
        let columns = stmt
            .query_map([], |row| {
                Ok(StoredColumn {
                    name: row.get(1)?,
                    declared_type: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Reading column metadata for '{table}'"))?;
        Ok(columns)
    }

    /// Closes the connection and reports any error SQLite raises while doing so.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .with_context(|| format!("Closing SQLite database {path:?}"))
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed existing {path:?}");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Removing existing database {path:?}")),
    }
}

//! The ingest pipeline: validate, recreate, stream chunks, verify.
//!
//! ```text
//! start -> validate -> (create | append)* -> verify -> report
//! ```
//!
//! Each chunk is classified, coerced, and committed before the next one is
//! read, so peak memory is bounded by `--chunk-size` rather than by the file.
//! A failure part-way through leaves the chunks already committed in place.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    chunk::ChunkReader,
    cli::{Cli, InferenceMode},
    coerce::{self, ColumnAffinity},
    detect::NumericDetector,
    error::IngestError,
    io_utils,
    schema::{self, TableSchema},
    store::Destination,
    summary::LoadSummary,
};

/// Loads `args.input` into `args.table` of `args.database` and returns what was stored.
pub fn execute(args: &Cli) -> Result<LoadSummary> {
    if !args.input.is_file() {
        return Err(IngestError::InputNotFound {
            path: args.input.clone(),
        }
        .into());
    }
    schema::validate_table_name(&args.table)?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let detector = NumericDetector::new(args.sample_size, args.threshold);

    info!(
        "Loading '{}' into {:?} table '{}' (delimiter '{}', chunks of {} row(s))",
        args.input.display(),
        args.database,
        args.table,
        crate::printable_delimiter(delimiter),
        args.chunk_size
    );

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter)?;
    let raw_headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading header row of {:?}", args.input))?
        .ok_or_else(|| IngestError::MissingHeader {
            path: args.input.clone(),
        })?;
    let headers = schema::normalize_headers(&raw_headers);
    debug!("Columns: {:?}", headers);

    let mut dest = Destination::recreate(&args.database)?;
    let mut chunks = ChunkReader::new(reader, encoding, headers.len(), args.chunk_size);

    let mut table: Option<TableSchema> = None;
    let mut fixed_numeric: Option<Vec<bool>> = None;
    let mut streamed_rows = 0u64;
    let mut chunk_count = 0usize;

    while let Some(chunk) = chunks
        .next_chunk()
        .with_context(|| format!("Reading chunk {} of {:?}", chunk_count + 1, args.input))?
    {
        chunk_count += 1;
        let numeric = match (&fixed_numeric, args.inference) {
            (Some(decided), InferenceMode::FirstChunk) => decided.clone(),
            _ => coerce::classify_chunk(&chunk, &detector),
        };
        if args.inference == InferenceMode::FirstChunk && fixed_numeric.is_none() {
            fixed_numeric = Some(numeric.clone());
        }
        let typed = coerce::coerce_chunk(chunk, &numeric);

        let target = match table.take() {
            Some(existing) => {
                report_drift(&existing, &typed.affinities, chunk_count);
                existing
            }
            None => {
                let created = TableSchema::new(&args.table, &headers, &typed.affinities);
                dest.create_table(&created)?;
                created
            }
        };
        let written = dest
            .append_chunk(&target, &typed)
            .with_context(|| format!("Writing chunk {chunk_count} to {:?}", dest.path()))?;
        table = Some(target);
        streamed_rows += written as u64;
        info!("Chunk {chunk_count}: {written} row(s) written ({streamed_rows} total)");
    }

    if table.is_none() {
        info!("No data rows found; creating empty table from header");
        dest.create_table(&TableSchema::all_text(&args.table, &headers))?;
    }

    let stored_rows = dest.row_count(&args.table)?;
    let columns = dest.table_info(&args.table)?;
    dest.close()?;

    if stored_rows != streamed_rows {
        warn!("Table holds {stored_rows} row(s) but {streamed_rows} were streamed");
    }
    info!(
        "Loaded {stored_rows} row(s) across {chunk_count} chunk(s) into '{}'",
        args.table
    );

    Ok(LoadSummary {
        database: args.database.clone(),
        table: args.table.clone(),
        stored_rows,
        streamed_rows,
        chunks: chunk_count,
        columns,
    })
}

fn report_drift(table: &TableSchema, affinities: &[ColumnAffinity], chunk: usize) {
    for (column, affinity) in table.columns.iter().zip(affinities) {
        if column.affinity.is_numeric() != affinity.is_numeric() {
            warn!(
                "Chunk {chunk}: column '{}' stored as {affinity} but declared {}",
                column.name, column.affinity
            );
        }
    }
}

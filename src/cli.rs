use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub const DEFAULT_INPUT: &str = "team_data_combined/plays.csv";
pub const DEFAULT_DATABASE: &str = "plays.db";
pub const DEFAULT_TABLE: &str = "plays";
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_THRESHOLD: f64 = 0.95;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Load a CSV file into a single SQLite table, storing numeric-looking columns as numbers",
    long_about = None
)]
pub struct Cli {
    /// Source CSV file (first row is the header)
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    /// Destination SQLite database (replaced on every run)
    #[arg(short = 'd', long = "database", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,
    /// Destination table name
    #[arg(short = 't', long = "table", default_value = DEFAULT_TABLE)]
    pub table: String,
    /// Number of rows read and written per chunk
    #[arg(long = "chunk-size", default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_positive)]
    pub chunk_size: usize,
    /// Number of non-missing values sampled per column when detecting numeric columns
    #[arg(long = "sample-size", default_value_t = DEFAULT_SAMPLE_SIZE, value_parser = parse_positive)]
    pub sample_size: usize,
    /// Fraction of sampled values that must look numeric (0 < threshold <= 1)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: f64,
    /// When numeric columns are decided
    #[arg(long, value_enum, default_value = "per-chunk")]
    pub inference: InferenceMode,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the load summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Cli {
            input: PathBuf::from(DEFAULT_INPUT),
            database: PathBuf::from(DEFAULT_DATABASE),
            table: DEFAULT_TABLE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            threshold: DEFAULT_THRESHOLD,
            inference: InferenceMode::default(),
            delimiter: None,
            input_encoding: None,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum InferenceMode {
    /// Every chunk is assessed on its own values
    #[default]
    PerChunk,
    /// The first chunk decides numeric columns for the whole run
    FirstChunk,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    let parsed: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a whole number"))?;
    if parsed == 0 {
        return Err("Value must be at least 1".to_string());
    }
    Ok(parsed)
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !(parsed > 0.0 && parsed <= 1.0) {
        return Err("Threshold must be greater than 0 and at most 1".to_string());
    }
    Ok(parsed)
}

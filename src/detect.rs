//! Sample-based detection of text columns that hold numbers.
//!
//! A column is numeric when at least `threshold` of its first `sample_size`
//! non-missing values are plain signed integers or decimals. Exponents,
//! thousands separators, and non-ASCII digits do not count.

use std::sync::OnceLock;

use regex::Regex;

use crate::cli::{DEFAULT_SAMPLE_SIZE, DEFAULT_THRESHOLD};

static NUMERIC_LITERAL: OnceLock<Regex> = OnceLock::new();

fn numeric_literal() -> &'static Regex {
    NUMERIC_LITERAL.get_or_init(|| {
        Regex::new(r"^[+-]?[0-9]+(?:\.[0-9]+)?$").expect("numeric literal pattern is valid")
    })
}

/// True when `value`, ignoring surrounding whitespace, is `[+-]digits(.digits)`.
pub fn is_numeric_literal(value: &str) -> bool {
    numeric_literal().is_match(value.trim())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDetector {
    pub sample_size: usize,
    pub threshold: f64,
}

impl Default for NumericDetector {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl NumericDetector {
    pub fn new(sample_size: usize, threshold: f64) -> Self {
        Self {
            sample_size,
            threshold,
        }
    }

    /// Classifies a column of possibly-missing values. An empty sample is never numeric.
    pub fn looks_numeric<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut sampled = 0usize;
        let mut matches = 0usize;
        for value in values.into_iter().flatten().take(self.sample_size) {
            sampled += 1;
            if is_numeric_literal(value) {
                matches += 1;
            }
        }
        if sampled == 0 {
            return false;
        }
        (matches as f64 / sampled as f64) >= self.threshold
    }
}

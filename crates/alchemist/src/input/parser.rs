//! CSV/TSV sheet loader with delimiter detection.
//!
//! Produces untyped rows keyed by the sheet's own headers; typing into
//! records happens in [`EntityCollection::from_rows`].

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::headers::normalize_headers;
use super::source::SourceMetadata;
use crate::entity::{CellValue, EntityCollection, EntityKind, RawRow};
use crate::error::{AlchemistError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads delimited sheets into raw rows.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Load a file as a typed collection of `kind`.
    pub fn parse_file(
        &self,
        path: impl AsRef<Path>,
        kind: EntityKind,
    ) -> Result<(EntityCollection, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| AlchemistError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let (raw_headers, rows) = self.parse_bytes(&contents, delimiter)?;
        let headers = normalize_headers(&raw_headers, kind);

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            file = %path.display(),
            kind = %kind,
            rows = rows.len(),
            columns = headers.len(),
            "loaded sheet"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            kind,
            raw_headers,
            headers,
            rows.len(),
        );

        Ok((EntityCollection::from_rows(kind, rows), metadata))
    }

    /// Parse delimited bytes into the header row and raw data rows.
    ///
    /// Short rows are padded with empty text cells; surplus cells are dropped.
    /// Repeated headers are made unique (`Notes`, `Notes_2`) so no cell is lost.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<(Vec<String>, Vec<RawRow>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AlchemistError::EmptyData("No columns found".to_string()));
        }
        let headers = unique_headers(headers);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            let row: RawRow = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = record.get(i).unwrap_or_default();
                    (header.clone(), CellValue::text(value))
                })
                .collect();
            rows.push(row);
        }

        Ok((headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Rename repeated headers so every column keys its own cell.
///
/// The first occurrence keeps its name; later ones get `_2`, `_3`, ...
/// Repeated blank headers become `Column{position}`.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());

    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            if seen.insert(header.clone()) {
                return header;
            }

            let blank = header.trim().is_empty();
            let stem = if blank {
                format!("Column{}", index + 1)
            } else {
                header.clone()
            };
            let mut suffix = 2;
            let mut candidate = if blank {
                stem.clone()
            } else {
                format!("{}_{}", stem, suffix)
            };
            while !seen.insert(candidate.clone()) {
                suffix += 1;
                candidate = format!("{}_{}", stem, suffix);
            }

            debug!(header = %header, renamed = %candidate, "renamed repeated header");
            candidate
        })
        .collect()
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(AlchemistError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines win; tab breaks ties.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

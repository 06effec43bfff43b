//! Metadata about a loaded sheet.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Entity kind the sheet was loaded as.
    pub kind: EntityKind,
    /// Headers as found in the file.
    pub raw_headers: Vec<String>,
    /// Headers after normalization.
    pub headers: Vec<String>,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        kind: EntityKind,
        raw_headers: Vec<String>,
        headers: Vec<String>,
        row_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            kind,
            raw_headers,
            headers,
            row_count,
            loaded_at: Utc::now(),
        }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

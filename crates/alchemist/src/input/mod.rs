//! Input handling: header normalization and sheet ingestion.

mod headers;
mod parser;
mod source;

pub use headers::{normalize_header, normalize_headers, normalize_row};
pub use parser::{Parser, ParserConfig};
pub use source::SourceMetadata;

//! Export module for turning crawl fragments into downloadable tables
//!
//! This module handles:
//! - Concatenating structured fragments and re-parsing their rows
//! - Serializing the rows as one timestamped CSV file

mod csv_export;

pub use csv_export::{
    export_filename, export_fragments, export_text, parse_rows, CsvExport, CSV_CONTENT_TYPE,
};

use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

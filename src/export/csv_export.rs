//! CSV export of structured fragments
//!
//! Fragment texts are concatenated line by line and re-parsed as delimited
//! rows. Rows of any width pass through; rows with no fields are dropped.

use crate::export::{ExportError, ExportResult};
use crate::inference::StructuredFragment;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Content type of every export
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A downloadable CSV file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// `hotel_rooms_<YYYYMMDD_HHMMSS>.csv`
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Number of rows written
    pub row_count: usize,
}

impl CsvExport {
    /// Writes the export into `directory`, creating it if needed
    ///
    /// # Returns
    ///
    /// The full path of the written file
    pub fn write_to(&self, directory: &Path) -> ExportResult<PathBuf> {
        fs::create_dir_all(directory)?;
        let path = directory.join(&self.filename);
        fs::write(&path, &self.body)?;
        Ok(path)
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Builds the export filename for a given time
pub fn export_filename(timestamp: NaiveDateTime) -> String {
    format!("hotel_rooms_{}.csv", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Exports all fragments of a crawl as one CSV file
pub fn export_fragments(
    fragments: &[StructuredFragment],
    timestamp: NaiveDateTime,
) -> ExportResult<CsvExport> {
    let text = fragments
        .iter()
        .map(StructuredFragment::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    export_text(&text, timestamp)
}

/// Exports previously aggregated fragment text as one CSV file
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use hotel_scout::export_text;
///
/// let at = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let export = export_text("Grand,Suite\n\nGrand,Double", at).unwrap();
/// assert_eq!(export.filename, "hotel_rooms_20240501_093000.csv");
/// assert_eq!(export.row_count, 2);
/// ```
pub fn export_text(text: &str, timestamp: NaiveDateTime) -> ExportResult<CsvExport> {
    let rows = parse_rows(text);

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in &rows {
        writer.write_record(row)?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| ExportError::Write(e.to_string()))?;

    tracing::debug!("Exported {} rows", rows.len());

    Ok(CsvExport {
        filename: export_filename(timestamp),
        content_type: CSV_CONTENT_TYPE,
        body,
        row_count: rows.len(),
    })
}

/// Parses delimited text into rows, dropping empty or unreadable ones
pub fn parse_rows(text: &str) -> Vec<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(|record| match record {
            Ok(record) if !record.is_empty() => Some(record),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Dropping malformed row: {}", e);
                None
            }
        })
        .collect()
}

//! Hotel-Scout: a bounded accommodation-listing crawler
//!
//! This crate walks a small number of pages on an unknown hotel website, asks a
//! pluggable classifier whether each page already lists rooms or points
//! elsewhere, and turns every listing page into CSV rows with a fixed schema.

pub mod config;
pub mod crawler;
pub mod export;
pub mod inference;
pub mod state;

use thiserror::Error;

/// Main error type for Hotel-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("A seed URL is required to start a crawl")]
    MissingInput,

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTML parse error: {0}")]
    Parse(#[from] crawler::ParseError),

    #[error("Classification failed: {0}")]
    Classification(inference::InferenceError),

    #[error("Structuring failed: {0}")]
    Structuring(inference::InferenceError),

    #[error("Inference setup error: {0}")]
    Inference(#[from] inference::InferenceError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Hotel-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlSession};
pub use export::{export_fragments, export_text, CsvExport};
pub use inference::{Classification, RoomSchema, StructuredFragment};
pub use state::PageOutcome;

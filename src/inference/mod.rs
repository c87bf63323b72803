//! Inference module: the page classifier and data structurer collaborators
//!
//! This module contains:
//! - The `PageClassifier` / `DataStructurer` traits the coordinator depends on
//! - The `Classification` decision and `StructuredFragment` output types
//! - Column schemas for structured rows
//! - A completion-service backed implementation of both collaborators

mod anthropic;
mod llm;
mod schema;
mod traits;
mod types;

pub use anthropic::AnthropicClient;
pub use llm::{LlmClassifier, LlmStructurer};
pub use schema::{RoomSchema, NOT_AVAILABLE};
pub use traits::{CompletionClient, CompletionRequest, DataStructurer, PageClassifier};
pub use types::{Classification, StructuredFragment};

use thiserror::Error;

/// Errors raised by a classification or structuring call
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),

    #[error("API key contains characters not allowed in a header")]
    InvalidApiKey,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response contained no text")]
    EmptyResponse,
}

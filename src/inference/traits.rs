//! Collaborator traits for the extract-vs-navigate decision and row structuring
//!
//! The coordinator only sees these traits. Concrete implementations (an
//! inference service, a fixed script in tests) are injected at construction.

use crate::crawler::NormalizedPage;
use crate::inference::{Classification, InferenceError, StructuredFragment};
use async_trait::async_trait;

/// Decides whether a page already lists accommodation or where to look next
#[async_trait]
pub trait PageClassifier: Send + Sync {
    /// Classifies one normalized page
    ///
    /// # Arguments
    ///
    /// * `page` - The normalized page content
    /// * `source_url` - The URL the page was fetched from
    async fn classify(
        &self,
        page: &NormalizedPage,
        source_url: &str,
    ) -> Result<Classification, InferenceError>;
}

/// Converts free-form listing text into fixed-column CSV rows
#[async_trait]
pub trait DataStructurer: Send + Sync {
    async fn structure(&self, payload: &str) -> Result<StructuredFragment, InferenceError>;
}

/// One role-scoped completion request
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    /// Role instruction (system prompt)
    pub system: &'a str,
    /// Free-form user content
    pub prompt: &'a str,
}

/// Synchronous-looking text completion service
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, InferenceError>;
}

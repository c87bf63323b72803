//! Classifier and structurer backed by a text completion service

use crate::crawler::NormalizedPage;
use crate::inference::{
    Classification, CompletionClient, CompletionRequest, DataStructurer, InferenceError,
    PageClassifier, RoomSchema, StructuredFragment,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Asks the completion service whether to extract from a page or move on
pub struct LlmClassifier {
    client: Arc<dyn CompletionClient>,
    schema: RoomSchema,
}

impl LlmClassifier {
    pub fn new(client: Arc<dyn CompletionClient>, schema: RoomSchema) -> Self {
        Self { client, schema }
    }
}

/// Builds the user message for the classification call
fn classification_prompt(page: &NormalizedPage, source_url: &str) -> String {
    format!(
        "Looking at {}\n\n\
         Should I extract room info from this page or navigate elsewhere? \
         If navigation needed, provide the specific URL to check.\n\n\
         Page content:\n{}",
        source_url, page.text
    )
}

#[async_trait]
impl PageClassifier for LlmClassifier {
    async fn classify(
        &self,
        page: &NormalizedPage,
        source_url: &str,
    ) -> Result<Classification, InferenceError> {
        let system = self.schema.classifier_instruction();
        let prompt = classification_prompt(page, source_url);

        let response = self
            .client
            .complete(CompletionRequest {
                system: &system,
                prompt: &prompt,
            })
            .await?;

        Ok(Classification::from_response(response))
    }
}

/// Asks the completion service to render listing text as CSV rows
pub struct LlmStructurer {
    client: Arc<dyn CompletionClient>,
    schema: RoomSchema,
}

impl LlmStructurer {
    pub fn new(client: Arc<dyn CompletionClient>, schema: RoomSchema) -> Self {
        Self { client, schema }
    }
}

#[async_trait]
impl DataStructurer for LlmStructurer {
    async fn structure(&self, payload: &str) -> Result<StructuredFragment, InferenceError> {
        let system = self.schema.structurer_instruction();
        let prompt = format!(
            "Please convert this room information into structured CSV data:\n\n{}",
            payload
        );

        let text = self
            .client
            .complete(CompletionRequest {
                system: &system,
                prompt: &prompt,
            })
            .await?;

        Ok(StructuredFragment::new(text))
    }
}

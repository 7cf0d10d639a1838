//! The reviewer seam between HTTP handlers and the language-model provider.
//!
//! Handlers hold an `Arc<dyn Reviewer>` so tests can swap in a canned
//! reviewer without any network access.

use async_trait::async_trait;
use tracing::info;

use crate::llm_client::{LlmClient, LlmError};
use crate::review::upload::PaperUpload;

#[async_trait]
pub trait Reviewer: Send + Sync {
    /// Produces review text for a paper under the given reviewer instructions.
    async fn review_paper(
        &self,
        api_key: &str,
        paper: &PaperUpload,
        instructions: &str,
    ) -> Result<String, LlmError>;

    /// Forwards a plain prompt and returns the model's reply.
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Two calls: upload the paper, then ask the review model about it.
#[async_trait]
impl Reviewer for LlmClient {
    async fn review_paper(
        &self,
        api_key: &str,
        paper: &PaperUpload,
        instructions: &str,
    ) -> Result<String, LlmError> {
        let file = self
            .upload_file(api_key, &paper.file_name, paper.kind.mime(), paper.data.clone())
            .await?;
        info!(file_id = %file.id, kind = ?paper.kind, bytes = paper.size(), "Paper uploaded for review");

        self.create_response(api_key, instructions, &file.id).await
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
        self.chat(api_key, prompt).await
    }
}

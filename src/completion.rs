use crate::error::CompletionError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// A text-completion backend: one prompt in, generated choices out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}

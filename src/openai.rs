use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::completion::CompletionClient;
use crate::config::OpenAiConfig;
use crate::error::CompletionError;
use crate::types::{CompletionRequest, CompletionResponse};

/// [`CompletionClient`] for the OpenAI text-completions endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[tracing::instrument(skip(self, request), fields(model = %request.model, max_tokens = request.max_tokens))]
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| CompletionError::Transport(e.to_string()))?;
            let data = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(CompletionError::Service {
                status: status.as_u16(),
                data,
            });
        }

        tracing::debug!(status = status.as_u16(), "Completion response received");
        response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))
    }
}

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::protocol::openai::OpenAIProtocol;
use crate::provider::{CompletionProvider, LLMError, Result};
use crate::types::{CompletionRequest, CompletionResult};

/// OpenAI-compatible chat completions provider.
///
/// The endpoint is the full chat completions URL, posted to as-is.
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl fmt::Debug for OpenAIProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    /// Create a provider that shares an existing connection pool.
    pub fn new_with_client(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(LLMError::Endpoint("chat completions endpoint is empty".to_string()));
        }
        let body = OpenAIProtocol::build_request(&self.model, request)?;

        log::debug!(
            "OpenAI-compatible request to {} (model {}, max_tokens {})",
            endpoint,
            self.model,
            request.max_output_tokens
        );

        let builder = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key));
        let text = super::common::post_json(builder, &body, cancel).await?;

        OpenAIProtocol::parse_response(&text).map_err(LLMError::MalformedResponse)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

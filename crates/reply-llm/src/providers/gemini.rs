//! Google Gemini provider implementation.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::protocol::gemini::{GeminiProtocol, GeminiRequest};
use crate::protocol::ToProvider;
use crate::provider::{CompletionProvider, LLMError, Result};
use crate::types::{CompletionRequest, CompletionResult};

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_CONTENT_SUFFIX: &str = ":generateContent";

/// Google Gemini `generateContent` provider.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    /// Create a provider that shares an existing connection pool.
    pub fn new_with_client(api_key: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
        }
    }

    /// Set the endpoint: either a full `...:generateContent` URL or an API base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model name used when the endpoint is a base URL.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Resolve the URL the request is posted to.
    pub fn request_url(&self) -> Result<String> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(LLMError::Endpoint("Gemini endpoint is empty".to_string()));
        }
        if endpoint.contains(GENERATE_CONTENT_SUFFIX) {
            return Ok(endpoint.to_string());
        }

        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        Ok(format!("{endpoint}/{model_path}{GENERATE_CONTENT_SUFFIX}"))
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult> {
        let body: GeminiRequest = request.to_provider()?;
        let url = self.request_url()?;

        log::debug!(
            "Gemini request to {} (system {} chars, user {} chars, maxOutputTokens {})",
            url,
            request.system_instruction.chars().count(),
            request.user_instruction.chars().count(),
            request.max_output_tokens
        );

        let builder = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key);
        let text = super::common::post_json(builder, &body, cancel).await?;

        GeminiProtocol::parse_response(&text).map_err(LLMError::MalformedResponse)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

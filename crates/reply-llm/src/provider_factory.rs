//! Provider Factory
//!
//! Creates completion providers from resolved settings. The wire format is
//! picked from the endpoint, so a single `apiEndpoint` setting decides it.

use std::sync::Arc;

use reply_core::Settings;
use reqwest::Client;

use crate::provider::{CompletionProvider, LLMError};
use crate::providers::{GeminiProvider, OpenAIProvider};

/// Wire formats the pipeline can talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAI,
}

impl ProviderKind {
    pub fn from_endpoint(endpoint: &str) -> Self {
        let endpoint = endpoint.trim();
        if endpoint.contains(":generateContent")
            || endpoint.contains("generativelanguage.googleapis.com")
        {
            ProviderKind::Gemini
        } else {
            ProviderKind::OpenAI
        }
    }
}

/// Create a provider for the given settings on top of `client`.
pub fn create_provider(
    settings: &Settings,
    client: &Client,
) -> Result<Arc<dyn CompletionProvider>, LLMError> {
    let api_key = settings
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| LLMError::Auth("API key is required".to_string()))?;

    let kind = ProviderKind::from_endpoint(&settings.endpoint);
    log::debug!(
        "Creating {:?} provider for endpoint '{}' (model '{}')",
        kind,
        settings.endpoint,
        settings.model
    );

    let provider: Arc<dyn CompletionProvider> = match kind {
        ProviderKind::Gemini => Arc::new(
            GeminiProvider::new_with_client(api_key, client.clone())
                .with_endpoint(&settings.endpoint)
                .with_model(&settings.model),
        ),
        ProviderKind::OpenAI => Arc::new(
            OpenAIProvider::new_with_client(api_key, client.clone())
                .with_endpoint(&settings.endpoint)
                .with_model(&settings.model),
        ),
    };
    Ok(provider)
}

/// Seam used by the dispatcher to obtain a provider per request.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, settings: &Settings) -> Result<Arc<dyn CompletionProvider>, LLMError>;
}

/// Default factory building real HTTP providers.
///
/// Every provider it creates shares one `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpProviderFactory {
    client: Client,
}

impl HttpProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, settings: &Settings) -> Result<Arc<dyn CompletionProvider>, LLMError> {
        create_provider(settings, &self.client)
    }
}

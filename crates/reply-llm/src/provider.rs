use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::types::{CompletionRequest, CompletionResult};

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Protocol conversion error: {0}")]
    Protocol(#[from] crate::protocol::ProtocolError),

    /// A 2xx body that does not match the provider's response shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(#[source] crate::protocol::ProtocolError),
}

pub type Result<T> = std::result::Result<T, LLMError>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one non-streaming completion.
    ///
    /// # Arguments
    /// * `request` - System and user instructions plus generation settings
    /// * `cancel` - Aborts the in-flight call with `LLMError::Cancelled` when triggered
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

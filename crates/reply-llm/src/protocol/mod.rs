//! Protocol conversion traits and types.
//!
//! Hub-and-spoke conversion: every provider wire format converts to and from
//! the internal types in `crate::types`.
//!
//! ```text
//! Provider Types (Gemini, OpenAI-compatible)
//!     ↕
//! Internal Types (CompletionRequest, CompletionResult)
//! ```

mod errors;
pub mod gemini;
pub mod openai;

pub use errors::{ProtocolError, ProtocolResult};
pub use gemini::GeminiProtocol;
pub use openai::OpenAIProtocol;

/// Convert from a provider-specific type to an internal type ("spoke → hub").
pub trait FromProvider<T>: Sized {
    fn from_provider(value: T) -> ProtocolResult<Self>;
}

/// Convert from an internal type to a provider-specific type ("hub → spoke").
pub trait ToProvider<T>: Sized {
    fn to_provider(&self) -> ProtocolResult<T>;
}

pub(crate) fn require_text(value: &str, field: &str) -> ProtocolResult<()> {
    if value.trim().is_empty() {
        return Err(ProtocolError::MissingField(field.to_string()));
    }
    Ok(())
}

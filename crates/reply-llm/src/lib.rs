pub mod api_error;
pub mod interpret;
pub mod protocol;
pub mod provider;
pub mod provider_factory;
pub mod providers;
pub mod types;

pub use api_error::extract_provider_message;
pub use interpret::{
    evaluate_candidate, evaluate_result, interpret_suggestions, interpret_text, parse_single_text,
    parse_suggestions, CandidateIssue, EvaluationContext,
};
pub use provider::{CompletionProvider, LLMError, Result};
pub use provider_factory::{create_provider, HttpProviderFactory, ProviderFactory, ProviderKind};
pub use providers::{GeminiProvider, OpenAIProvider};
pub use types::{
    Candidate, CompletionRequest, CompletionResult, FinishReason, ResponseFormat, SafetyRating,
};

//! Provider-independent request and result types.
//!
//! Every wire format converts into these (see `protocol`), so the prompt
//! builder and the interpreter never branch on provider identity.

use serde::{Deserialize, Serialize};

/// MIME type the provider is asked to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFormat {
    Json,
    PlainText,
}

impl ResponseFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::PlainText => "text/plain",
        }
    }
}

/// One-shot completion request: a system instruction plus a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_instruction: String,
    pub response_format: ResponseFormat,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Why the provider stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other(String),
}

impl FinishReason {
    /// Map a provider code (Gemini upper-case or OpenAI lower-case) to a reason.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "STOP" | "END_TURN" => FinishReason::Stop,
            "MAX_TOKENS" | "LENGTH" => FinishReason::MaxTokens,
            "SAFETY" | "CONTENT_FILTER" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
                FinishReason::Safety
            }
            "RECITATION" => FinishReason::Recitation,
            _ => FinishReason::Other(code.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyRating {
    /// Provider category code, e.g. `HARM_CATEGORY_HARASSMENT`.
    pub category: String,
    pub probability: Option<String>,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Candidate {
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
    pub safety_ratings: Vec<SafetyRating>,
}

impl Candidate {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some(FinishReason::Stop),
            safety_ratings: Vec::new(),
        }
    }

    pub fn blocked_categories(&self) -> Vec<String> {
        self.safety_ratings
            .iter()
            .filter(|rating| rating.blocked)
            .map(|rating| rating.category.clone())
            .collect()
    }
}

/// Normalized completion payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionResult {
    pub candidates: Vec<Candidate>,
    /// Set when the provider refused the prompt itself and produced no candidate.
    pub prompt_block_reason: Option<String>,
}

impl CompletionResult {
    pub fn single(candidate: Candidate) -> Self {
        Self {
            candidates: vec![candidate],
            prompt_block_reason: None,
        }
    }

    pub fn first(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

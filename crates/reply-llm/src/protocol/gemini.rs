//! Google Gemini protocol conversion implementation.
//!
//! Gemini `generateContent` format:
//! - Messages are called "contents", content is an array of "parts"
//! - The system instruction is separate from the contents
//! - Generation settings live in "generationConfig"
//!
//! # Example Gemini Request
//! ```json
//! {
//!   "systemInstruction": {"parts": [{"text": "You draft replies"}]},
//!   "contents": [{"role": "user", "parts": [{"text": "Thread..."}]}],
//!   "generationConfig": {
//!     "responseMimeType": "application/json",
//!     "temperature": 0.4,
//!     "maxOutputTokens": 1024
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::protocol::{require_text, FromProvider, ProtocolError, ProtocolResult, ToProvider};
use crate::types::{Candidate, CompletionRequest, CompletionResult, FinishReason, SafetyRating};

/// Gemini protocol converter.
pub struct GeminiProtocol;

impl GeminiProtocol {
    /// Parse a raw `generateContent` response body.
    pub fn parse_response(body: &str) -> ProtocolResult<CompletionResult> {
        let response: GeminiResponse = serde_json::from_str(body)?;
        CompletionResult::from_provider(response)
    }
}

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    /// "user" or "model"; absent on system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub response_mime_type: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<GeminiSafetyRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiSafetyRating {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<String>,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<GeminiSafetyRating>,
}

// ============================================================================
// Internal → Gemini (ToProvider)
// ============================================================================

impl ToProvider<GeminiRequest> for CompletionRequest {
    fn to_provider(&self) -> ProtocolResult<GeminiRequest> {
        require_text(&self.user_instruction, "user instruction")?;
        if self.max_output_tokens == 0 {
            return Err(ProtocolError::InvalidContent(
                "maxOutputTokens must be positive".to_string(),
            ));
        }

        let system_instruction = if self.system_instruction.trim().is_empty() {
            None
        } else {
            Some(GeminiContent::text(None, &self.system_instruction))
        };

        Ok(GeminiRequest {
            contents: vec![GeminiContent::text(Some("user"), &self.user_instruction)],
            system_instruction,
            generation_config: Some(GeminiGenerationConfig {
                response_mime_type: self.response_format.mime_type().to_string(),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            }),
        })
    }
}

// ============================================================================
// Gemini → Internal (FromProvider)
// ============================================================================

impl FromProvider<GeminiSafetyRating> for SafetyRating {
    fn from_provider(rating: GeminiSafetyRating) -> ProtocolResult<Self> {
        Ok(SafetyRating {
            category: rating.category,
            probability: rating.probability,
            blocked: rating.blocked,
        })
    }
}

impl FromProvider<GeminiCandidate> for Candidate {
    fn from_provider(candidate: GeminiCandidate) -> ProtocolResult<Self> {
        // Parts are concatenated; a candidate without any text part has no text.
        let text = candidate.content.and_then(|content| {
            let texts: Vec<String> = content.parts.into_iter().filter_map(|part| part.text).collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts.concat())
            }
        });

        let safety_ratings = candidate
            .safety_ratings
            .into_iter()
            .map(SafetyRating::from_provider)
            .collect::<ProtocolResult<Vec<_>>>()?;

        Ok(Candidate {
            text,
            finish_reason: candidate.finish_reason.as_deref().map(FinishReason::from_code),
            safety_ratings,
        })
    }
}

impl FromProvider<GeminiResponse> for CompletionResult {
    fn from_provider(response: GeminiResponse) -> ProtocolResult<Self> {
        let candidates = response
            .candidates
            .into_iter()
            .map(Candidate::from_provider)
            .collect::<ProtocolResult<Vec<_>>>()?;

        Ok(CompletionResult {
            candidates,
            prompt_block_reason: response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseFormat;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_instruction: "system".to_string(),
            user_instruction: "user".to_string(),
            response_format: ResponseFormat::Json,
            temperature: 0.4,
            max_output_tokens: 1024,
        }
    }

    #[test]
    fn request_serializes_gemini_shape() {
        let body: GeminiRequest = request().to_provider().unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "user"}]}],
                "systemInstruction": {"parts": [{"text": "system"}]},
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "temperature": 0.4_f32,
                    "maxOutputTokens": 1024
                }
            })
        );
    }

    #[test]
    fn plain_text_mode_uses_text_mime() {
        let mut req = request();
        req.response_format = ResponseFormat::PlainText;
        let body: GeminiRequest = req.to_provider().unwrap();
        assert_eq!(body.generation_config.unwrap().response_mime_type, "text/plain");
    }

    #[test]
    fn empty_user_instruction_is_rejected() {
        let mut req = request();
        req.user_instruction = "  ".to_string();
        let result: ProtocolResult<GeminiRequest> = req.to_provider();
        assert!(matches!(result, Err(ProtocolError::MissingField(_))));
    }

    #[test]
    fn response_parts_are_joined_and_metadata_kept() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "[\"a\","}, {"text": "\"b\"]"}]},
                "finishReason": "MAX_TOKENS",
                "safetyRatings": [
                    {"category": "HARM_CATEGORY_HARASSMENT", "probability": "LOW"}
                ]
            }]
        })
        .to_string();

        let result = GeminiProtocol::parse_response(&body).unwrap();
        let candidate = result.first().unwrap();
        assert_eq!(candidate.text.as_deref(), Some("[\"a\",\"b\"]"));
        assert_eq!(candidate.finish_reason, Some(FinishReason::MaxTokens));
        assert!(!candidate.safety_ratings[0].blocked);
    }

    #[test]
    fn prompt_feedback_block_is_kept() {
        let body = json!({
            "promptFeedback": {"blockReason": "SAFETY", "safetyRatings": []}
        })
        .to_string();
        let result = GeminiProtocol::parse_response(&body).unwrap();
        assert!(result.candidates.is_empty());
        assert_eq!(result.prompt_block_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn candidate_without_parts_has_no_text() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string();
        let result = GeminiProtocol::parse_response(&body).unwrap();
        assert_eq!(result.first().unwrap().text, None);
    }

    #[test]
    fn malformed_body_is_a_serialization_error() {
        let err = GeminiProtocol::parse_response("<html>").unwrap_err();
        assert!(matches!(err, ProtocolError::Serialization(_)));
    }
}

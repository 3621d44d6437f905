//! OpenAI-compatible chat completions protocol conversion.

use serde::{Deserialize, Serialize};

use crate::protocol::{require_text, FromProvider, ProtocolError, ProtocolResult};
use crate::types::{Candidate, CompletionRequest, CompletionResult, FinishReason};

/// OpenAI protocol converter.
pub struct OpenAIProtocol;

impl OpenAIProtocol {
    /// Build a chat completions body. The model travels in the body, unlike Gemini.
    pub fn build_request(model: &str, request: &CompletionRequest) -> ProtocolResult<OpenAIChatRequest> {
        require_text(model, "model")?;
        require_text(&request.user_instruction, "user instruction")?;
        if request.max_output_tokens == 0 {
            return Err(ProtocolError::InvalidContent(
                "max_tokens must be positive".to_string(),
            ));
        }

        let mut messages = Vec::with_capacity(2);
        if !request.system_instruction.trim().is_empty() {
            messages.push(OpenAIMessage::new("system", &request.system_instruction));
        }
        messages.push(OpenAIMessage::new("user", &request.user_instruction));

        Ok(OpenAIChatRequest {
            model: model.to_string(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        })
    }

    /// Parse a raw chat completions response body.
    pub fn parse_response(body: &str) -> ProtocolResult<CompletionResult> {
        let response: OpenAIChatResponse = serde_json::from_str(body)?;
        CompletionResult::from_provider(response)
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl OpenAIMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatResponse {
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub message: Option<OpenAIMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// ============================================================================
// OpenAI → Internal (FromProvider)
// ============================================================================

impl FromProvider<OpenAIChoice> for Candidate {
    fn from_provider(choice: OpenAIChoice) -> ProtocolResult<Self> {
        Ok(Candidate {
            text: choice.message.and_then(|message| message.content),
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_code),
            safety_ratings: Vec::new(),
        })
    }
}

impl FromProvider<OpenAIChatResponse> for CompletionResult {
    fn from_provider(response: OpenAIChatResponse) -> ProtocolResult<Self> {
        let candidates = response
            .choices
            .into_iter()
            .map(Candidate::from_provider)
            .collect::<ProtocolResult<Vec<_>>>()?;
        Ok(CompletionResult {
            candidates,
            prompt_block_reason: None,
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
            temperature: 0.5,
            max_output_tokens: 512,
        }
    }

    #[test]
    fn builds_role_tagged_messages() {
        let body = OpenAIProtocol::build_request("gpt-4o-mini", &request()).unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "system"},
                    {"role": "user", "content": "user"}
                ],
                "temperature": 0.5,
                "max_tokens": 512
            })
        );
    }

    #[test]
    fn blank_model_is_rejected() {
        assert!(matches!(
            OpenAIProtocol::build_request(" ", &request()),
            Err(ProtocolError::MissingField(_))
        ));
    }

    #[test]
    fn parses_choices() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "[\"x\"]"}, "finish_reason": "length"}
            ]
        })
        .to_string();
        let result = OpenAIProtocol::parse_response(&body).unwrap();
        let candidate = result.first().unwrap();
        assert_eq!(candidate.text.as_deref(), Some("[\"x\"]"));
        assert_eq!(candidate.finish_reason, Some(FinishReason::MaxTokens));
    }

    #[test]
    fn missing_choices_yield_no_candidates() {
        let result = OpenAIProtocol::parse_response("{}").unwrap();
        assert!(result.candidates.is_empty());
    }
}

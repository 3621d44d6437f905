//! Error taxonomy of the reply pipeline.
//!
//! Every failure is terminal for its request; nothing is retried.

use std::time::Duration;

use reply_core::{ConfigError, Language};
use reply_llm::api_error::ERROR_SNIPPET_CHARS;
use reply_llm::{CandidateIssue, LLMError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Provider request failed{}: {provider_message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        provider_message: String,
    },

    #[error("Request timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("The provider returned no candidate")]
    NoResponse,

    #[error("Blocked by safety filters: {}", .categories.join(", "))]
    SafetyBlocked { categories: Vec<String> },

    #[error("Generation was stopped by safety filters")]
    SafetyStopped,

    #[error("Generation was blocked for reciting existing material")]
    RecitationBlocked,

    #[error("{activity} output hit the {limit}-token limit (maxOutputTokens = {limit}); shorten the input and retry")]
    TruncatedOutput { activity: String, limit: u32 },

    #[error("The provider returned no usable result")]
    EmptyResult,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({code})")).unwrap_or_default()
}

impl From<CandidateIssue> for ReplyError {
    fn from(issue: CandidateIssue) -> Self {
        match issue {
            CandidateIssue::NoResponse => ReplyError::NoResponse,
            CandidateIssue::SafetyBlocked { categories } => ReplyError::SafetyBlocked { categories },
            CandidateIssue::SafetyStopped => ReplyError::SafetyStopped,
            CandidateIssue::RecitationBlocked => ReplyError::RecitationBlocked,
            CandidateIssue::TruncatedOutput { activity, limit } => {
                ReplyError::TruncatedOutput { activity, limit }
            }
        }
    }
}

impl From<LLMError> for ReplyError {
    fn from(error: LLMError) -> Self {
        match error {
            LLMError::Auth(_) => ReplyError::MissingApiKey,
            LLMError::Status { status, message } => ReplyError::Transport {
                status: Some(status),
                provider_message: message,
            },
            LLMError::Http(error) => ReplyError::Transport {
                status: error.status().map(|status| status.as_u16()),
                provider_message: error.to_string(),
            },
            LLMError::Cancelled => ReplyError::Cancelled,
            LLMError::Endpoint(message) => ReplyError::Config(message),
            LLMError::MalformedResponse(error) => {
                log::warn!("Discarding unreadable provider response: {}", error);
                ReplyError::NoResponse
            }
            LLMError::Protocol(error) => ReplyError::Transport {
                status: None,
                provider_message: format!("Unreadable provider response: {error}"),
            },
        }
    }
}

impl From<ConfigError> for ReplyError {
    fn from(error: ConfigError) -> Self {
        ReplyError::Config(error.to_string())
    }
}

impl ReplyError {
    /// User-facing text in the request language.
    pub fn user_message(&self, language: Language) -> String {
        match language {
            Language::Ja => self.message_ja(),
            Language::En => self.message_en(),
        }
    }

    fn message_en(&self) -> String {
        match self {
            ReplyError::MissingApiKey => {
                "API key is not configured. Set it in the extension settings.".to_string()
            }
            ReplyError::Transport {
                status,
                provider_message,
            } => format!(
                "AI request failed{}. {}",
                status_suffix(status),
                snippet(provider_message)
            )
            .trim_end()
            .to_string(),
            ReplyError::Timeout { after } => format!(
                "The AI request timed out after {} seconds. Please try again.",
                after.as_secs()
            ),
            ReplyError::Cancelled => "The AI request was cancelled.".to_string(),
            ReplyError::NoResponse => "The AI returned no response.".to_string(),
            ReplyError::SafetyBlocked { categories } => format!(
                "The request was blocked by safety filters ({}).",
                harm_labels(categories, Language::En)
            ),
            ReplyError::SafetyStopped => {
                "Generation was stopped by safety filters. Please rephrase the content.".to_string()
            }
            ReplyError::RecitationBlocked => {
                "Generation was blocked because it reproduced existing material.".to_string()
            }
            ReplyError::TruncatedOutput { .. } => format!("{self}."),
            ReplyError::EmptyResult => {
                "Could not get a usable result from the AI.".to_string()
            }
            ReplyError::Config(message) => format!("Could not read the settings: {message}"),
            ReplyError::InvalidRequest(message) => format!("Invalid request: {message}"),
        }
    }

    fn message_ja(&self) -> String {
        match self {
            ReplyError::MissingApiKey => {
                "APIキーが設定されていません。拡張機能のポップアップから設定してください。".to_string()
            }
            ReplyError::Transport {
                status,
                provider_message,
            } => format!(
                "AIリクエストに失敗しました{}。{}",
                status_suffix(status),
                snippet(provider_message)
            ),
            ReplyError::Timeout { after } => format!(
                "AIの応答がタイムアウトしました（{}秒）。もう一度お試しください。",
                after.as_secs()
            ),
            ReplyError::Cancelled => "AIリクエストがキャンセルされました。".to_string(),
            ReplyError::NoResponse => "AIから応答がありませんでした。".to_string(),
            ReplyError::SafetyBlocked { categories } => format!(
                "安全性フィルターによりブロックされました（{}）。",
                harm_labels(categories, Language::Ja)
            ),
            ReplyError::SafetyStopped => {
                "安全性フィルターにより生成が停止されました。内容を変えてお試しください。".to_string()
            }
            ReplyError::RecitationBlocked => {
                "既存の文章の引用と判定されたため生成がブロックされました。".to_string()
            }
            ReplyError::TruncatedOutput { limit, .. } => format!(
                "出力がトークン上限（maxOutputTokens = {limit}）に達しました。入力を短くして再試行してください。"
            ),
            ReplyError::EmptyResult => "AIから有効な結果を取得できませんでした。".to_string(),
            ReplyError::Config(message) => format!("設定を読み込めませんでした: {message}"),
            ReplyError::InvalidRequest(message) => format!("リクエストが不正です: {message}"),
        }
    }
}

fn snippet(message: &str) -> String {
    message.trim().chars().take(ERROR_SNIPPET_CHARS).collect()
}

/// Human-readable names for provider harm categories.
fn harm_labels(categories: &[String], language: Language) -> String {
    let labels: Vec<String> = categories
        .iter()
        .map(|category| harm_label(category, language))
        .collect();
    let separator = match language {
        Language::Ja => "、",
        Language::En => ", ",
    };
    labels.join(separator)
}

fn harm_label(category: &str, language: Language) -> String {
    let code = category.trim().trim_start_matches("HARM_CATEGORY_");
    let label = match (code, language) {
        ("HARASSMENT", Language::En) => "harassment",
        ("HARASSMENT", Language::Ja) => "嫌がらせ",
        ("HATE_SPEECH", Language::En) => "hate speech",
        ("HATE_SPEECH", Language::Ja) => "ヘイトスピーチ",
        ("SEXUALLY_EXPLICIT", Language::En) => "sexually explicit content",
        ("SEXUALLY_EXPLICIT", Language::Ja) => "性的な表現",
        ("DANGEROUS_CONTENT", Language::En) => "dangerous content",
        ("DANGEROUS_CONTENT", Language::Ja) => "危険なコンテンツ",
        ("CIVIC_INTEGRITY", Language::En) => "civic integrity",
        ("CIVIC_INTEGRITY", Language::Ja) => "市民の健全性",
        _ => return code.to_ascii_lowercase().replace('_', " "),
    };
    label.to_string()
}

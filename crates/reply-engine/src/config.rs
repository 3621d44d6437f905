use std::time::Duration;

use reply_llm::{EvaluationContext, ResponseFormat};

use crate::prompt::{PROOFREAD_TEXT_LIMIT, REPLY_CONTEXT_LIMIT};

/// Generation settings of one operation mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeProfile {
    /// Upper bound on the network wait.
    pub timeout: Duration,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub response_format: ResponseFormat,
    /// Character budget for the context or source text.
    pub input_limit: usize,
    /// Used in truncation messages, e.g. "Reply generation".
    pub activity_label: &'static str,
}

impl ModeProfile {
    pub fn suggestions() -> Self {
        Self {
            timeout: Duration::from_secs(45),
            max_output_tokens: 1024,
            temperature: 0.4,
            response_format: ResponseFormat::Json,
            input_limit: REPLY_CONTEXT_LIMIT,
            activity_label: "Reply generation",
        }
    }

    pub fn lightning() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_output_tokens: 512,
            activity_label: "Lightning reply",
            ..Self::suggestions()
        }
    }

    pub fn proofread() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_output_tokens: 2048,
            temperature: 0.2,
            response_format: ResponseFormat::PlainText,
            input_limit: PROOFREAD_TEXT_LIMIT,
            activity_label: "Proofreading",
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn evaluation_context(&self) -> EvaluationContext<'static> {
        EvaluationContext {
            max_output_tokens: self.max_output_tokens,
            activity_label: self.activity_label,
        }
    }
}

/// Configuration for the request dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub suggestions: ModeProfile,
    pub lightning: ModeProfile,
    pub proofread: ModeProfile,
    /// Presets honoured per request; extra ids are ignored in request order.
    pub max_presets: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            suggestions: ModeProfile::suggestions(),
            lightning: ModeProfile::lightning(),
            proofread: ModeProfile::proofread(),
            max_presets: 4,
        }
    }
}

impl DispatcherConfig {
    /// Apply one network timeout to every mode.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.suggestions.timeout = timeout;
        self.lightning.timeout = timeout;
        self.proofread.timeout = timeout;
        self
    }
}

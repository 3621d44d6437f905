//! Prompt construction.
//!
//! Builders are pure: identical input produces byte-identical instructions.
//! Everything they receive is already resolved (count clamped, presets
//! looked up, context truncated) by [`ResolvedPromptContext`].

pub mod proofread;
pub mod reply;
pub mod truncate;

use reply_core::{GenerationRequest, InstructionPreset, Language, MAX_SUGGESTIONS, MIN_SUGGESTIONS};

pub use proofread::{build_proofread_system_instruction, build_proofread_user_instruction};
pub use reply::{build_system_instruction, build_user_instruction};
pub use truncate::{
    truncate_chars, ELLIPSIS, PRESET_CONTENT_LIMIT, PROOFREAD_TEXT_LIMIT, REPLY_CONTEXT_LIMIT,
};

/// A preset as it appears inside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPreset {
    pub name: String,
    pub content: String,
}

impl PromptPreset {
    pub fn from_preset(preset: &InstructionPreset) -> Self {
        Self {
            name: preset.name.clone(),
            content: truncate_chars(&preset.content, PRESET_CONTENT_LIMIT),
        }
    }
}

/// Everything the reply builders need for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPromptContext {
    pub language: Language,
    pub count: u8,
    pub context: String,
    pub user_intent: Option<String>,
    pub tones: Vec<String>,
    pub presets: Vec<PromptPreset>,
}

impl ResolvedPromptContext {
    /// Resolve a request against its already selected presets.
    pub fn resolve(
        request: &GenerationRequest,
        count: u8,
        presets: &[&InstructionPreset],
        context_limit: usize,
    ) -> Self {
        Self {
            language: request.language,
            count: count.clamp(MIN_SUGGESTIONS, MAX_SUGGESTIONS),
            context: truncate_chars(request.context.trim(), context_limit),
            user_intent: request.intent().map(str::to_string),
            tones: request.tone_labels().into_iter().map(str::to_string).collect(),
            presets: presets.iter().map(|preset| PromptPreset::from_preset(preset)).collect(),
        }
    }

    pub fn language_label(&self) -> &'static str {
        self.language.label()
    }

    pub fn system_instruction(&self) -> String {
        build_system_instruction(self.language_label(), self.count, &self.tones, &self.presets)
    }

    pub fn user_instruction(&self) -> String {
        build_user_instruction(
            self.language_label(),
            self.count,
            &self.context,
            self.user_intent.as_deref(),
            &self.presets,
        )
    }
}

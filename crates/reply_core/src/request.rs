//! GenerationRequest - the immutable input of a reply generation call.

use serde_json::Value;

use crate::language::Language;

pub const DEFAULT_SUGGESTION_COUNT: u8 = 3;
pub const MIN_SUGGESTIONS: u8 = 1;
pub const MAX_SUGGESTIONS: u8 = 5;

/// Normalized parameters of one reply generation.
///
/// `suggestion_count_override` keeps the raw caller value; it is only
/// interpreted by [`resolve_suggestion_count`] so that malformed overrides
/// fall back to the stored setting instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub context: String,
    pub language: Language,
    pub user_intent: Option<String>,
    pub tones: Vec<String>,
    pub instruction_preset_refs: Vec<String>,
    pub suggestion_count_override: Option<Value>,
}

impl GenerationRequest {
    pub fn new(context: impl Into<String>, language: Language) -> Self {
        Self {
            context: context.into(),
            language,
            ..Default::default()
        }
    }

    pub fn with_user_intent(mut self, intent: impl Into<String>) -> Self {
        self.user_intent = Some(intent.into());
        self
    }

    pub fn with_tones<I, S>(mut self, tones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tones = tones.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preset_refs<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instruction_preset_refs = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_count_override(mut self, value: Value) -> Self {
        self.suggestion_count_override = Some(value);
        self
    }

    /// Trimmed user intent, `None` when absent or blank.
    pub fn intent(&self) -> Option<&str> {
        self.user_intent
            .as_deref()
            .map(str::trim)
            .filter(|intent| !intent.is_empty())
    }

    /// Non-blank tone labels in request order.
    pub fn tone_labels(&self) -> Vec<&str> {
        self.tones
            .iter()
            .map(|tone| tone.trim())
            .filter(|tone| !tone.is_empty())
            .collect()
    }
}

/// Interpret a stored or caller-supplied count.
///
/// Numbers and numeric strings are rounded and clamped into
/// `[MIN_SUGGESTIONS, MAX_SUGGESTIONS]`. Zero counts as unset, like any
/// non-numeric value, and yields `None`.
pub fn count_from_value(value: &Value) -> Option<u8> {
    let numeric = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !numeric.is_finite() || numeric == 0.0 {
        return None;
    }
    let clamped = numeric
        .round()
        .clamp(f64::from(MIN_SUGGESTIONS), f64::from(MAX_SUGGESTIONS));
    Some(clamped as u8)
}

/// Resolve the number of suggestions for a request: caller override first,
/// then the stored setting, then [`DEFAULT_SUGGESTION_COUNT`].
pub fn resolve_suggestion_count(override_value: Option<&Value>, stored: Option<&Value>) -> u8 {
    override_value
        .and_then(count_from_value)
        .or_else(|| stored.and_then(count_from_value))
        .unwrap_or(DEFAULT_SUGGESTION_COUNT)
}

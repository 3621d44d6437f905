//! Inbound host messages and the response envelope sent back.

use reply_core::{GenerationRequest, Language};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReplyError;
use crate::sequence::RequestKind;

/// A message from the host, tagged by `type` with its fields under `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum InboundMessage {
    #[serde(rename = "SMART_REPLY_GENERATE")]
    Generate(GeneratePayload),
    #[serde(rename = "LIGHTNING_REPLY_GENERATE")]
    Lightning(LightningPayload),
    #[serde(rename = "SMART_PROOFREAD_GENERATE")]
    Proofread(ProofreadPayload),
    #[serde(rename = "SMART_REPLY_PROMPT_PREVIEW")]
    PromptPreview(PreviewPayload),
}

impl InboundMessage {
    pub fn kind(&self) -> RequestKind {
        match self {
            InboundMessage::Generate(_) => RequestKind::Suggestions,
            InboundMessage::Lightning(_) => RequestKind::Lightning,
            InboundMessage::Proofread(_) => RequestKind::Proofread,
            InboundMessage::PromptPreview(_) => RequestKind::PromptPreview,
        }
    }

    pub fn language(&self) -> Language {
        match self {
            InboundMessage::Generate(payload) => payload.language,
            InboundMessage::Lightning(payload) => payload.language,
            InboundMessage::Proofread(payload) => payload.language,
            InboundMessage::PromptPreview(payload) => payload.language,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratePayload {
    pub context: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    pub tones: Vec<String>,
    pub instruction_preset_ids: Vec<String>,
    /// Kept raw: malformed counts fall back to the stored setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_count: Option<Value>,
}

impl GeneratePayload {
    pub fn to_request(&self) -> GenerationRequest {
        let mut request = GenerationRequest::new(self.context.clone(), self.language)
            .with_tones(self.tones.iter().cloned())
            .with_preset_refs(self.instruction_preset_ids.iter().cloned());
        request.user_intent = self.user_prompt.clone();
        request.suggestion_count_override = self.suggestion_count.clone();
        request
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightningPayload {
    pub context: String,
    pub language: Language,
    pub instruction_preset_ids: Vec<String>,
}

impl LightningPayload {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.context.clone(), self.language)
            .with_preset_refs(self.instruction_preset_ids.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProofreadPayload {
    pub text: String,
    pub language: Language,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewPayload {
    pub language: Language,
    pub instruction_preset_ids: Vec<String>,
}

impl PreviewPayload {
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::new("", self.language)
            .with_preset_refs(self.instruction_preset_ids.iter().cloned())
    }
}

/// `{id, name}` of a preset honoured by a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMeta {
    pub language_label: String,
    pub count: u8,
    pub instruction_presets: Vec<PresetSummary>,
}

/// The system instruction a reply request would use, with its resolved parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPreview {
    pub system_prompt: String,
    pub meta: PromptMeta,
}

/// Response sent back to the host. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PromptMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ResponseEnvelope {
    pub fn suggestions(suggestions: Vec<String>, language: Language) -> Self {
        Self {
            ok: true,
            suggestions: Some(suggestions),
            language: Some(language),
            ..Default::default()
        }
    }

    pub fn suggestion(suggestion: String, language: Language) -> Self {
        Self {
            ok: true,
            suggestion: Some(suggestion),
            language: Some(language),
            ..Default::default()
        }
    }

    pub fn preview(preview: PromptPreview) -> Self {
        Self {
            ok: true,
            system_prompt: Some(preview.system_prompt),
            meta: Some(preview.meta),
            ..Default::default()
        }
    }

    pub fn failure(error: &ReplyError, language: Language) -> Self {
        Self {
            ok: false,
            error: Some(error.user_message(language)),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_message_from_host_json() {
        let message: InboundMessage = serde_json::from_value(json!({
            "type": "SMART_REPLY_GENERATE",
            "payload": {
                "context": "Can we meet Friday?",
                "language": "ja",
                "userPrompt": "Accept",
                "instructionPresetIds": ["p1", "p2"],
                "suggestionCount": "4"
            }
        }))
        .unwrap();

        assert_eq!(message.kind(), RequestKind::Suggestions);
        assert_eq!(message.language(), Language::Ja);
        let InboundMessage::Generate(payload) = message else {
            panic!("expected generate payload");
        };
        let request = payload.to_request();
        assert_eq!(request.intent(), Some("Accept"));
        assert_eq!(request.instruction_preset_refs, vec!["p1", "p2"]);
        assert_eq!(request.suggestion_count_override, Some(json!("4")));
        assert!(request.tones.is_empty());
    }

    #[test]
    fn other_message_types() {
        let lightning: InboundMessage = serde_json::from_value(json!({
            "type": "LIGHTNING_REPLY_GENERATE",
            "payload": {"context": "Hi", "language": "en"}
        }))
        .unwrap();
        assert_eq!(lightning.kind(), RequestKind::Lightning);

        let proofread: InboundMessage = serde_json::from_value(json!({
            "type": "SMART_PROOFREAD_GENERATE",
            "payload": {"text": "teh text"}
        }))
        .unwrap();
        assert_eq!(proofread.language(), Language::En);

        let preview: InboundMessage = serde_json::from_value(json!({
            "type": "SMART_REPLY_PROMPT_PREVIEW",
            "payload": {"language": "ja", "instructionPresetIds": ["a"]}
        }))
        .unwrap();
        assert_eq!(preview.kind(), RequestKind::PromptPreview);

        assert!(serde_json::from_value::<InboundMessage>(json!({"type": "UNKNOWN", "payload": {}})).is_err());
    }

    #[test]
    fn envelopes_omit_absent_fields() {
        let ok = serde_json::to_value(ResponseEnvelope::suggestions(
            vec!["a".to_string()],
            Language::Ja,
        ))
        .unwrap();
        assert_eq!(ok, json!({"ok": true, "suggestions": ["a"], "language": "ja"}));

        let failed = serde_json::to_value(ResponseEnvelope::failure(
            &ReplyError::EmptyResult,
            Language::En,
        ))
        .unwrap();
        assert_eq!(
            failed,
            json!({"ok": false, "error": "Could not get a usable result from the AI."})
        );
    }

    #[test]
    fn preview_envelope_uses_camel_case_meta() {
        let envelope = ResponseEnvelope::preview(PromptPreview {
            system_prompt: "You are...".to_string(),
            meta: PromptMeta {
                language_label: "Japanese".to_string(),
                count: 3,
                instruction_presets: vec![PresetSummary {
                    id: "p1".to_string(),
                    name: "Formal".to_string(),
                }],
            },
        });
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({
                "ok": true,
                "systemPrompt": "You are...",
                "meta": {
                    "languageLabel": "Japanese",
                    "count": 3,
                    "instructionPresets": [{"id": "p1", "name": "Formal"}]
                }
            })
        );
    }
}

//! Instruction presets - user-authored guidance blocks folded into prompts.
//!
//! Presets are read from the configuration record. The current layout is
//! `instructionPresets.entries`; older installs stored the same data as
//! `styleExamples.categories`, and the oldest ones as
//! `styleExamples.audiences[].scenes[].examples[]`. All three layouts are
//! normalized into [`InstructionPreset`] values here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_INSTRUCTION_PRESETS: &str = "instructionPresets";
pub const KEY_STYLE_EXAMPLES: &str = "styleExamples";

/// Upper bound of legacy style categories carried over.
pub const MAX_LEGACY_CATEGORIES: usize = 12;

const LEGACY_EXAMPLE_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionPreset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "useInLightningDefault")]
    pub use_in_lightning: bool,
}

impl InstructionPreset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            use_in_lightning: false,
        }
    }

    pub fn lightning(mut self, enabled: bool) -> Self {
        self.use_in_lightning = enabled;
        self
    }

    /// Normalize one stored entry. Entries without a non-blank id or name are rejected.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        let id = non_blank(object.get("id"))?;
        let name = non_blank(object.get("name"))?;
        let content = object
            .get("content")
            .and_then(Value::as_str)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();
        Some(Self {
            id,
            name,
            content,
            use_in_lightning: lightning_flag(object),
        })
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn lightning_flag(object: &Map<String, Value>) -> bool {
    object
        .get("useInLightning")
        .or_else(|| object.get("useInLightningDefault"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Extract every preset from a configuration record.
///
/// `instructionPresets.entries` wins whenever it is an array, even an empty
/// one; legacy style examples are only consulted when it is missing.
pub fn presets_from_record(record: &Map<String, Value>) -> Vec<InstructionPreset> {
    if let Some(entries) = record
        .get(KEY_INSTRUCTION_PRESETS)
        .and_then(|presets| presets.get("entries"))
        .and_then(Value::as_array)
    {
        return dedupe_by_id(entries.iter().filter_map(InstructionPreset::from_value));
    }

    match record.get(KEY_STYLE_EXAMPLES) {
        Some(style_examples) => legacy_presets(style_examples),
        None => Vec::new(),
    }
}

fn dedupe_by_id(presets: impl Iterator<Item = InstructionPreset>) -> Vec<InstructionPreset> {
    let mut seen = HashSet::new();
    presets
        .filter(|preset| seen.insert(preset.id.clone()))
        .collect()
}

fn legacy_presets(style_examples: &Value) -> Vec<InstructionPreset> {
    if let Some(categories) = style_examples.get("categories").and_then(Value::as_array) {
        let presets = categories
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| legacy_category(index, raw));
        return dedupe_by_id(presets).into_iter().take(MAX_LEGACY_CATEGORIES).collect();
    }

    if let Some(audiences) = style_examples.get("audiences").and_then(Value::as_array) {
        let mut presets = convert_audiences(audiences);
        presets.truncate(MAX_LEGACY_CATEGORIES);
        return presets;
    }

    Vec::new()
}

fn legacy_category(index: usize, raw: &Value) -> Option<InstructionPreset> {
    let object = raw.as_object()?;
    let name = non_blank(object.get("name"))?;
    let id = non_blank(object.get("id")).unwrap_or_else(|| legacy_id(index));
    let content = object
        .get("content")
        .and_then(Value::as_str)
        .map(|content| content.trim_end().to_string())
        .unwrap_or_default();
    Some(InstructionPreset {
        id,
        name,
        content,
        use_in_lightning: lightning_flag(object),
    })
}

fn legacy_id(index: usize) -> String {
    format!("legacy-{}", index + 1)
}

/// Merge audience scenes into one category per scene name.
fn convert_audiences(audiences: &[Value]) -> Vec<InstructionPreset> {
    let mut presets: Vec<InstructionPreset> = Vec::new();

    for audience in audiences {
        let audience_name = audience
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        let scenes = audience
            .get("scenes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for scene in scenes {
            let name = non_blank(scene.get("name")).unwrap_or_else(|| audience_name.to_string());
            if name.is_empty() {
                continue;
            }

            let block = scene
                .get("examples")
                .and_then(Value::as_array)
                .map(|examples| {
                    examples
                        .iter()
                        .filter_map(render_legacy_example)
                        .collect::<Vec<_>>()
                        .join(LEGACY_EXAMPLE_SEPARATOR)
                })
                .unwrap_or_default();

            let position = match presets.iter().position(|preset| preset.name == name) {
                Some(position) => position,
                None => {
                    let id = legacy_id(presets.len());
                    presets.push(InstructionPreset::new(id, name, String::new()));
                    presets.len() - 1
                }
            };

            if block.is_empty() {
                continue;
            }
            let target = &mut presets[position];
            if target.content.is_empty() {
                target.content = block;
            } else {
                target.content = format!("{}{}{}", target.content, LEGACY_EXAMPLE_SEPARATOR, block);
            }
        }
    }

    presets
}

fn render_legacy_example(example: &Value) -> Option<String> {
    let parts: Vec<&str> = ["greeting", "body", "closing"]
        .iter()
        .filter_map(|field| example.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

use super::PromptPreset;

const NO_CONTEXT_PLACEHOLDER: &str = "(none provided)";
const EMPTY_PRESET_CONTENT: &str = "(no additional instructions)";

/// System instruction for reply suggestions.
pub fn build_system_instruction<S: AsRef<str>>(
    language_label: &str,
    count: u8,
    tones: &[S],
    presets: &[PromptPreset],
) -> String {
    let mut sections = vec![
        format!(
            "You are an assistant that drafts professional {language_label} email replies on behalf of the user."
        ),
        format!(
            "Output format: return only a valid JSON array containing exactly {count} strings. \
             Do not include any other text, explanations or markdown code fences."
        ),
        "Each string is one complete reply option of 1-3 sentences, ready to send as-is. \
         Never use placeholders such as [NAME] or [DATE]."
            .to_string(),
        "Inside each reply, separate the greeting, the body and the closing with a blank line."
            .to_string(),
    ];

    let tones: Vec<&str> = tones.iter().map(AsRef::as_ref).collect();
    if tones.is_empty() && presets.is_empty() {
        sections.push(
            "No style instructions were given. Infer a polite, sincere business tone from the \
             conversation context alone."
                .to_string(),
        );
        return sections.join("\n\n");
    }

    let mut style = String::from("Style requirements (satisfy all of them at the same time):");
    if !tones.is_empty() {
        style.push_str(&format!("\n- Tone: {}", tones.join(", ")));
    }
    if !presets.is_empty() {
        style.push_str(
            "\n- Apply every instruction preset below together, following each preset's tone, \
             wording and keyword cues.",
        );
    }
    style.push_str(
        "\n- When requirements conflict, blend them into one balanced reply instead of dropping any of them.",
    );
    sections.push(style);

    if !presets.is_empty() {
        let mut block = String::from("Instruction presets:");
        for (index, preset) in presets.iter().enumerate() {
            let content = if preset.content.trim().is_empty() {
                EMPTY_PRESET_CONTENT
            } else {
                preset.content.as_str()
            };
            block.push_str(&format!("\n\n#{} {}\n{}", index + 1, preset.name, content));
        }
        sections.push(block);
    }

    sections.join("\n\n")
}

/// User instruction for reply suggestions. Sections appear in a fixed order.
pub fn build_user_instruction(
    language_label: &str,
    count: u8,
    truncated_context: &str,
    user_intent: Option<&str>,
    presets: &[PromptPreset],
) -> String {
    let context = if truncated_context.trim().is_empty() {
        NO_CONTEXT_PLACEHOLDER
    } else {
        truncated_context
    };
    let mut sections = vec![format!("Conversation context:\n{context}")];

    if let Some(intent) = user_intent.map(str::trim).filter(|intent| !intent.is_empty()) {
        sections.push(format!("User intent:\n{intent}"));
    }

    if !presets.is_empty() {
        let names: Vec<&str> = presets.iter().map(|preset| preset.name.as_str()).collect();
        sections.push(format!("Instruction presets in use: {}", names.join(" / ")));
    }

    sections.push(format!(
        "Task: write {count} {language_label} reply options from the sender's side of this thread. \
         Respond to the latest message and address the recipient's next action. \
         Return them as a JSON array of exactly {count} strings."
    ));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(name: &str, content: &str) -> PromptPreset {
        PromptPreset {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn count_and_language_appear_in_system_instruction() {
        let prompt = build_system_instruction::<&str>("Japanese", 4, &[], &[]);
        assert!(prompt.contains("professional Japanese email replies"));
        assert!(prompt.contains("exactly 4 strings"));
        assert!(prompt.contains("[NAME]"));
    }

    #[test]
    fn neutral_fallback_without_tones_or_presets() {
        let prompt = build_system_instruction::<&str>("English", 3, &[], &[]);
        assert!(prompt.contains("polite, sincere business tone"));
        assert!(!prompt.contains("Style requirements"));
    }

    #[test]
    fn presets_are_numbered_blocks() {
        let presets = [preset("Formal", "Use keigo."), preset("Short", "")];
        let prompt = build_system_instruction("English", 2, &["warm"], &presets);

        assert!(prompt.contains("- Tone: warm"));
        assert!(prompt.contains("#1 Formal\nUse keigo."));
        assert!(prompt.contains(&format!("#2 Short\n{EMPTY_PRESET_CONTENT}")));
        assert!(prompt.contains("blend them"));
        assert!(!prompt.contains("sincere business tone"));
    }

    #[test]
    fn tones_alone_still_require_blending() {
        let prompt = build_system_instruction("English", 3, &["friendly", "concise"], &[]);
        assert!(prompt.contains("- Tone: friendly, concise"));
        assert!(!prompt.contains("Instruction presets:"));
    }

    #[test]
    fn system_instruction_is_deterministic() {
        let presets = [preset("A", "alpha"), preset("B", "beta")];
        let first = build_system_instruction("English", 3, &["calm"], &presets);
        let second = build_system_instruction("English", 3, &["calm"], &presets);
        assert_eq!(first, second);
    }

    #[test]
    fn user_instruction_sections_in_order() {
        let presets = [preset("Formal", "x"), preset("Short", "y")];
        let prompt = build_user_instruction("English", 2, "Thread body", Some(" Decline politely "), &presets);

        let context_at = prompt.find("Conversation context:\nThread body").unwrap();
        let intent_at = prompt.find("User intent:\nDecline politely").unwrap();
        let presets_at = prompt.find("Instruction presets in use: Formal / Short").unwrap();
        let task_at = prompt.find("Task: write 2 English reply options").unwrap();
        assert!(context_at < intent_at && intent_at < presets_at && presets_at < task_at);
        assert!(!prompt.contains("\nx"));
    }

    #[test]
    fn user_instruction_placeholders_and_omissions() {
        let prompt = build_user_instruction("Japanese", 1, "   ", Some(""), &[]);
        assert!(prompt.starts_with(&format!("Conversation context:\n{NO_CONTEXT_PLACEHOLDER}")));
        assert!(!prompt.contains("User intent"));
        assert!(!prompt.contains("Instruction presets in use"));
        assert!(prompt.contains("sender's side"));
    }
}

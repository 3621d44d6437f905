/// System instruction for proofreading.
pub fn build_proofread_system_instruction(language_label: &str) -> String {
    [
        format!("You are a meticulous {language_label} editor."),
        "Correct typos, grammatical errors and awkward phrasing in the text provided by the user. \
         Preserve its meaning, tone and line breaks."
            .to_string(),
        "Do not add new content, greetings or explanations.".to_string(),
        "Return only the revised text as plain text, without quotes or markdown.".to_string(),
    ]
    .join("\n")
}

/// User instruction wrapping the (already truncated) source text.
pub fn build_proofread_user_instruction(language_label: &str, text: &str) -> String {
    format!("Text to proofread:\n{text}\n\nReturn only the revised {language_label} text.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proofread_prompts_carry_language_and_text() {
        let system = build_proofread_system_instruction("Japanese");
        assert!(system.contains("Japanese editor"));
        assert!(system.contains("line breaks"));

        let user = build_proofread_user_instruction("Japanese", "本日はありがとございました。");
        assert!(user.starts_with("Text to proofread:\n本日はありがとございました。"));
        assert!(user.ends_with("revised Japanese text."));
    }
}

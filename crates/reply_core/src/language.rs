use std::fmt;

use serde::{Deserialize, Serialize};

/// Target language of generated replies and of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    /// Parse a language code. Anything that is not Japanese falls back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ja" | "ja-jp" | "jp" | "japanese" => Language::Ja,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Label used inside prompts sent to the model.
    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "Japanese",
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::from_code(&value)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_fall_back_to_english() {
        assert_eq!(Language::from_code("fr"), Language::En);
        assert_eq!(Language::from_code(""), Language::En);
        assert_eq!(Language::from_code(" JA "), Language::Ja);
    }

    #[test]
    fn deserializes_leniently_and_serializes_as_code() {
        let lang: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(lang, Language::Ja);
        let lang: Language = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(lang, Language::En);
        assert_eq!(serde_json::to_string(&Language::Ja).unwrap(), "\"ja\"");
    }

    #[test]
    fn labels() {
        assert_eq!(Language::Ja.label(), "Japanese");
        assert_eq!(Language::En.label(), "English");
    }
}

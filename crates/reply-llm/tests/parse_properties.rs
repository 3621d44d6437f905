//! Property tests for suggestion parsing.

use proptest::prelude::*;
use reply_llm::{parse_single_text, parse_suggestions};

fn trimmed_entry() -> impl Strategy<Value = String> {
    "[^\\s][^\\n]{0,40}"
        .prop_map(|entry| entry.trim().to_string())
        .prop_filter("non-empty after trim", |entry| !entry.is_empty())
}

proptest! {
    #[test]
    fn test_json_array_round_trip(entries in prop::collection::vec(trimmed_entry(), 0..8)) {
        let raw = serde_json::to_string(&entries).unwrap();
        prop_assert_eq!(parse_suggestions(&raw), entries);
    }

    #[test]
    fn test_suggestions_object_round_trip(entries in prop::collection::vec(trimmed_entry(), 1..6)) {
        let raw = serde_json::json!({ "suggestions": entries }).to_string();
        prop_assert_eq!(parse_suggestions(&raw), entries);
    }

    #[test]
    fn test_parsed_entries_are_trimmed_and_non_empty(raw in "\\PC{0,200}") {
        for entry in parse_suggestions(&raw) {
            prop_assert!(!entry.is_empty());
            prop_assert_eq!(entry.trim(), entry.as_str());
        }
    }

    #[test]
    fn test_single_text_is_trimmed(raw in "\\PC{0,80}") {
        prop_assert_eq!(parse_single_text(&raw), raw.trim());
    }
}

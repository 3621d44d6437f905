use serde_json::Value;

/// Raw body characters kept when the error body carries no structured message.
pub const ERROR_SNIPPET_CHARS: usize = 200;

/// Pull a human-readable message out of a provider error body.
///
/// Tries `error.message`, then a top-level `message`, and otherwise returns
/// the first [`ERROR_SNIPPET_CHARS`] characters of the raw body.
pub fn extract_provider_message(body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        let nested = parsed
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str);
        let top_level = parsed.get("message").and_then(Value::as_str);
        if let Some(message) = nested.or(top_level) {
            return message.to_string();
        }
    }

    body.chars().take(ERROR_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_error_message_wins() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"},"message":"outer"}"#;
        assert_eq!(extract_provider_message(body), "API key not valid");
    }

    #[test]
    fn top_level_message_is_used() {
        assert_eq!(extract_provider_message(r#"{"message":"quota exceeded"}"#), "quota exceeded");
    }

    #[test]
    fn raw_body_is_truncated() {
        let body = "x".repeat(500);
        assert_eq!(extract_provider_message(&body).len(), ERROR_SNIPPET_CHARS);
    }

    #[test]
    fn json_without_message_falls_back_to_raw() {
        let body = r#"{"error":"Service Unavailable"}"#;
        assert_eq!(extract_provider_message(body), body);
    }

    #[test]
    fn truncation_counts_characters() {
        let body = "あ".repeat(300);
        assert_eq!(extract_provider_message(&body).chars().count(), ERROR_SNIPPET_CHARS);
    }

    #[test]
    fn empty_body() {
        assert_eq!(extract_provider_message(""), "");
    }
}

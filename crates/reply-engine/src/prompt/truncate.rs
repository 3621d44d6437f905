/// Appended whenever text is cut.
pub const ELLIPSIS: &str = "...";

/// Thread context budget for reply generation (full and Lightning).
pub const REPLY_CONTEXT_LIMIT: usize = 15_000;

/// Source text budget for proofreading.
pub const PROOFREAD_TEXT_LIMIT: usize = 8_000;

/// Per-preset content budget.
pub const PRESET_CONTENT_LIMIT: usize = 1_200;

/// Keep the first `limit` characters of `text`, appending [`ELLIPSIS`] when anything was cut.
///
/// Counts `char`s, so multi-byte text is never split inside a code point.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

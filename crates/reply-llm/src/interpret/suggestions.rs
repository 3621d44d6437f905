//! Tolerant extraction of a suggestion list from model text.
//!
//! Providers do not always honour "JSON only". The strategies below are tried
//! in order; the first one that recognises the text wins. Only line recovery
//! may legitimately come back empty.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

type ParseStrategy = fn(&str) -> Option<Vec<String>>;

const STRATEGIES: &[(&str, ParseStrategy)] = &[
    ("direct_json", parse_direct_json),
    ("fenced_json", parse_fenced_json),
    ("line_recovery", recover_lines),
];

/// Object fields accepted as the text of a suggestion object.
const TEXT_FIELDS: &[&str] = &["text", "reply", "suggestion", "content"];

lazy_static! {
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").unwrap();
    static ref LEADING_MARKER: Regex =
        Regex::new(r"^(?:[-*+•・>]+\s*|\(?\d{1,3}[.)．、](?:\s+|$)|\(\d{1,3}\)\s*|[①-⑳]\s*)").unwrap();
    static ref JSON_KEY_LINE: Regex = Regex::new(r#"^"[A-Za-z_]+"\s*:\s*[\[{]?$"#).unwrap();
}

/// Parse model output into an ordered list of trimmed, non-empty suggestions.
///
/// Never fails; an empty list means nothing usable was found.
pub fn parse_suggestions(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    for (name, strategy) in STRATEGIES {
        if let Some(found) = strategy(trimmed) {
            log::debug!("Suggestions parsed by {} strategy ({} entries)", name, found.len());
            return finalize(found);
        }
    }
    Vec::new()
}

fn finalize(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Stage 1: the whole text is a JSON array or a `{"suggestions": [...]}` object.
fn parse_direct_json(text: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(text).ok()?;
    suggestions_from_value(&value)
}

/// Stage 2: the first fenced block whose body parses as stage 1 would.
fn parse_fenced_json(text: &str) -> Option<Vec<String>> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .find_map(|body| parse_direct_json(body.as_str().trim()))
}

/// Stage 3: line by line. Always succeeds.
fn recover_lines(text: &str) -> Option<Vec<String>> {
    let mut entries = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("```") || JSON_KEY_LINE.is_match(line) {
            continue;
        }

        if line.starts_with('[') {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(line) {
                for item in &items {
                    collect_strings(item, &mut entries);
                }
                continue;
            }
        }

        let cleaned = clean_line(line);
        if !cleaned.is_empty() {
            entries.push(cleaned);
        }
    }

    Some(entries)
}

fn suggestions_from_value(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(object) => object.get("suggestions")?.as_array()?,
        _ => return None,
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        collect_strings(item, &mut entries);
    }
    Some(entries)
}

/// String form of one JSON element. Nested arrays are flattened, `null` is dropped.
fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => out.push(text.trim().to_string()),
        Value::Number(number) => out.push(number.to_string()),
        Value::Bool(flag) => out.push(flag.to_string()),
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        Value::Object(object) => {
            if let Some(text) = TEXT_FIELDS
                .iter()
                .find_map(|field| object.get(*field).and_then(Value::as_str))
            {
                out.push(text.trim().to_string());
            }
        }
    }
}

fn is_stray_leading(c: char) -> bool {
    matches!(c, '[' | '{' | '"' | '\'' | '“' | '`' | ',')
}

fn is_stray_trailing(c: char) -> bool {
    matches!(c, ']' | '}' | '"' | '\'' | '”' | '`' | ',')
}

/// Drop list markers and JSON debris around a recovered line.
fn clean_line(line: &str) -> String {
    let line = line.trim_start_matches(is_stray_leading).trim_start();
    let line = LEADING_MARKER.replace(line, "");
    line.trim()
        .trim_start_matches(is_stray_leading)
        .trim_end_matches(is_stray_trailing)
        .trim()
        .to_string()
}

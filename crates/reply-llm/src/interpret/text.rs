/// Single-text mode used by proofreading: the whole candidate text, trimmed.
pub fn parse_single_text(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace_only() {
        assert_eq!(parse_single_text("\n  Fixed text.\nSecond line.  \n"), "Fixed text.\nSecond line.");
        assert_eq!(parse_single_text("   "), "");
    }
}

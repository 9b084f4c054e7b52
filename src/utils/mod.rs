// Code Telescope Utilities
//
// Small helpers shared by the prompt builder, the markdown renderer and the
// scanner.

/// Path conversion utilities (absolute ↔ relative Unix-style)
pub mod paths;

/// Character-safe text helpers
pub mod text {
    /// Truncate to at most `max_chars` characters (not bytes), appending
    /// `...` when cut
    pub fn truncate_string(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            text.chars().take(max_chars).collect::<String>() + "..."
        }
    }

    /// Truncate to `max_chars` characters and append `marker` when cut
    pub fn truncate_with_marker(text: &str, max_chars: usize, marker: &str) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str(marker);
        truncated
    }

    /// Collapse runs of whitespace (including newlines) to single spaces
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::text::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_string("короткий", 20), "короткий");
        assert_eq!(truncate_string("описание метода", 8), "описание...");
        assert_eq!(truncate_string("", 0), "");
    }

    #[test]
    fn marker_only_when_cut() {
        assert_eq!(truncate_with_marker("abc", 3, "[cut]"), "abc");
        assert_eq!(truncate_with_marker("abcd", 3, "[cut]"), "abc[cut]");
        assert_eq!(truncate_with_marker("файл", 2, "…"), "фа…");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  a\n\n b\tc "), "a b c");
    }
}

//! Language Support - Shared tree-sitter language configuration
//!
//! ALL grammar lookups go through this module so extractors and the registry
//! agree on language names.

use anyhow::Result;

/// Get tree-sitter language parser for a given language name
///
/// # Supported Languages
///
/// **Systems**: Go
/// **Web**: JavaScript (and JSX), TypeScript, TSX
/// **Scripting**: Python
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "go" => Ok(tree_sitter_go::LANGUAGE.into()),
        "typescript" => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "javascript" | "jsx" => Ok(tree_sitter_javascript::LANGUAGE.into()),
        "python" => Ok(tree_sitter_python::LANGUAGE.into()),

        _ => Err(anyhow::anyhow!(
            "Unsupported language: '{}'. Supported languages: go, javascript, jsx, typescript, tsx, python",
            language
        )),
    }
}

/// Detect language from a bare file extension (no leading dot)
///
/// Returns the grammar name that can be passed to `get_tree_sitter_language()`.
/// Matching is case-insensitive.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "go" => Some("go"),
        "js" | "jsx" | "mjs" | "cjs" => Some("javascript"),
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        "py" | "pyw" => Some("python"),
        _ => None,
    }
}

/// Normalize an extension to the registry's key form: lowercase with a leading dot
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_detected_language_has_a_grammar() {
        for ext in ["go", "js", "jsx", "mjs", "cjs", "ts", "mts", "cts", "tsx", "py", "pyw"] {
            let language = detect_language_from_extension(ext)
                .unwrap_or_else(|| panic!("no language for .{}", ext));
            assert!(
                get_tree_sitter_language(language).is_ok(),
                "missing grammar for {}",
                language
            );
        }
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(detect_language_from_extension("PY"), Some("python"));
        assert_eq!(detect_language_from_extension("Tsx"), Some("tsx"));
        assert_eq!(detect_language_from_extension("rb"), None);
    }

    #[test]
    fn unknown_grammar_is_an_error() {
        let err = get_tree_sitter_language("cobol").unwrap_err();
        assert!(err.to_string().contains("Unsupported language: 'cobol'"));
    }

    #[test]
    fn extensions_normalize_to_dotted_lowercase() {
        assert_eq!(normalize_extension("GO"), ".go");
        assert_eq!(normalize_extension(".Py"), ".py");
        assert_eq!(normalize_extension(" tsx "), ".tsx");
    }
}

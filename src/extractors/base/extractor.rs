// BaseExtractor for Code Telescope
//
// Read-only view over one file's content shared by every language walker.
// Holds no extraction state: walkers own their StructuralModel.

use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use super::types::Position;
use crate::errors::ExtractError;

/// Per-file helpers for language walkers
pub struct BaseExtractor<'a> {
    pub language: &'static str,
    pub file_path: &'a str,
    pub content: &'a str,
}

impl<'a> BaseExtractor<'a> {
    pub fn new(language: &'static str, file_path: &'a str, content: &'a str) -> Self {
        Self {
            language,
            file_path,
            content,
        }
    }

    /// Parse the file with `grammar`, rejecting trees that contain syntax errors
    pub fn parse(&self, grammar: &tree_sitter::Language) -> Result<Tree, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(grammar)
            .map_err(|e| self.grammar_error(e))?;

        let tree = parser
            .parse(self.content, None)
            .ok_or_else(|| self.parse_error("parser returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let location = first_error_position(root)
                .map(|p| format!(" at line {}, column {}", p.start_line, p.start_column))
                .unwrap_or_default();
            return Err(self.parse_error(format!("syntax error{}", location)));
        }

        debug!(
            "Parsed {} file {} ({} bytes)",
            self.language,
            self.file_path,
            self.content.len()
        );
        Ok(tree)
    }

    pub fn parse_error(&self, message: impl Into<String>) -> ExtractError {
        ExtractError::Parse {
            path: self.file_path.to_string(),
            message: message.into(),
        }
    }

    pub fn grammar_error(&self, message: impl ToString) -> ExtractError {
        ExtractError::Grammar {
            language: self.language.to_string(),
            message: message.to_string(),
        }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Byte slice, lossy on broken UTF-8 boundaries
        let content_bytes = self.content.as_bytes();
        if start_byte <= end_byte && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Text of the named field, if present
    pub fn field_text(&self, node: &Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|child| self.get_node_text(&child))
    }

    pub fn position(&self, node: &Node) -> Position {
        Position::from_node(node)
    }
}

fn first_error_position(node: Node) -> Option<Position> {
    if node.is_error() || node.is_missing() {
        return Some(Position::from_node(&node));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(position) = first_error_position(child) {
                return Some(position);
            }
        }
    }
    None
}

/// Strip one layer of matching string quotes (`"x"`, `'x'`, `` `x` ``)
pub fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    for quote in ['"', '\'', '`'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_handles_all_quote_styles() {
        assert_eq!(unquote("\"fmt\""), "fmt");
        assert_eq!(unquote("'./utils'"), "./utils");
        assert_eq!(unquote("`tpl`"), "tpl");
        assert_eq!(unquote("bare"), "bare");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn parse_reports_syntax_errors_with_location() {
        let grammar: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        let base = BaseExtractor::new("go", "broken.go", "package main\n\nfunc (\n");
        match base.parse(&grammar) {
            Err(ExtractError::Parse { path, message }) => {
                assert_eq!(path, "broken.go");
                assert!(message.contains("syntax error"), "message: {}", message);
            }
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn positions_are_one_based() {
        let grammar: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        let content = "package main\n\nfunc A() {}\n";
        let base = BaseExtractor::new("go", "a.go", content);
        let tree = base.parse(&grammar).unwrap();
        let root = tree.root_node();
        let func = root.named_child(1).unwrap();
        assert_eq!(func.kind(), "function_declaration");

        let position = base.position(&func);
        assert_eq!(position.start_line, 3);
        assert_eq!(position.start_column, 1);
        assert_eq!(position.end_line, 3);
        assert!(position.end_column >= position.start_column);
        assert_eq!(base.get_node_text(&func), "func A() {}");
    }
}

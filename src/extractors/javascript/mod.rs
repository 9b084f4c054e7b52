//! JavaScript / TypeScript Extractor
//!
//! One walker serves both languages; the TypeScript dialect runs it over the
//! TypeScript (or TSX) grammar and additionally handles interfaces, type
//! aliases, enums, accessibility modifiers and type annotations.
//!
//! Visibility: class members named `#x` are private and stored as `x`;
//! TypeScript `private`/`protected` members are non-public as well.

mod exports;
mod functions;
mod imports;
mod signatures;
mod types;
mod variables;
mod visibility;

use crate::errors::ExtractError;
use crate::extractors::base::{BaseExtractor, StructuralModel};
use crate::extractors::LanguageExtractor;
use std::path::Path;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    JavaScript,
    TypeScript,
}

#[derive(Debug, Clone, Copy)]
pub struct JavaScriptExtractor {
    dialect: Dialect,
}

impl JavaScriptExtractor {
    pub fn javascript() -> Self {
        Self {
            dialect: Dialect::JavaScript,
        }
    }

    pub fn typescript() -> Self {
        Self {
            dialect: Dialect::TypeScript,
        }
    }

    /// Grammar for a file: TSX files need the TSX grammar
    fn grammar_name(&self, file_path: &str) -> &'static str {
        match self.dialect {
            Dialect::JavaScript => "javascript",
            Dialect::TypeScript => {
                let is_tsx = Path::new(file_path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("tsx"));
                if is_tsx {
                    "tsx"
                } else {
                    "typescript"
                }
            }
        }
    }
}

impl LanguageExtractor for JavaScriptExtractor {
    fn language(&self) -> &'static str {
        match self.dialect {
            Dialect::JavaScript => "JavaScript",
            Dialect::TypeScript => "TypeScript",
        }
    }

    fn parse(&self, content: &str, file_path: &str) -> Result<StructuralModel, ExtractError> {
        let language = self.language();
        let base = BaseExtractor::new(language, file_path, content);
        let grammar = crate::language::get_tree_sitter_language(self.grammar_name(file_path))
            .map_err(|e| base.grammar_error(e))?;
        let tree = base.parse(&grammar)?;

        let mut walker = JsWalker {
            model: StructuralModel::new(language, file_path),
            base,
        };
        walker.visit_node(tree.root_node());
        Ok(walker.model)
    }
}

/// Single-pass walker over one JavaScript/TypeScript file
pub(super) struct JsWalker<'a> {
    base: BaseExtractor<'a>,
    model: StructuralModel,
}

impl JsWalker<'_> {
    fn visit_node(&mut self, node: Node) {
        match node.kind() {
            "import_statement" => self.extract_import(node),
            "export_statement" => self.extract_export(node),
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                self.extract_function_declaration(node)
            }
            "class_declaration" | "abstract_class_declaration" => self.extract_class(node),
            "lexical_declaration" | "variable_declaration" => {
                self.extract_variable_declaration(node)
            }
            "expression_statement" => self.extract_expression_statement(node),
            "interface_declaration" => self.extract_interface(node),
            "type_alias_declaration" => self.extract_type_alias(node),
            "enum_declaration" => self.extract_enum(node),
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.visit_node(child);
                }
            }
        }
    }
}

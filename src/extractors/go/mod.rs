mod functions;
mod helpers;
mod imports;
mod specs;
mod types;

use crate::errors::ExtractError;
use crate::extractors::base::{BaseExtractor, Export, ExportKind, Position, StructuralModel};
use crate::extractors::LanguageExtractor;
use tree_sitter::Node;

/// Go language extractor that handles Go-specific constructs including:
/// - Structs, interfaces, named types and type aliases
/// - Functions and methods with receivers (pointer and generic receivers)
/// - Imports (aliased, dot and blank imports)
/// - Constants and variables, including grouped declarations
///
/// Visibility follows Go's export rule: an identifier is public iff it
/// starts with an uppercase letter.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoExtractor;

impl GoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageExtractor for GoExtractor {
    fn language(&self) -> &'static str {
        "Go"
    }

    fn parse(&self, content: &str, file_path: &str) -> Result<StructuralModel, ExtractError> {
        let base = BaseExtractor::new("Go", file_path, content);
        let grammar = crate::language::get_tree_sitter_language("go")
            .map_err(|e| base.grammar_error(e))?;
        let tree = base.parse(&grammar)?;

        let mut walker = GoWalker {
            model: StructuralModel::new("Go", file_path),
            base,
        };
        walker.walk_tree(tree.root_node());

        // Receivers are declared outside the type body; mirror them in
        walker.model.attach_methods_to_types();
        Ok(walker.model)
    }
}

/// Single-pass walker over one Go file
pub(super) struct GoWalker<'a> {
    base: BaseExtractor<'a>,
    model: StructuralModel,
}

impl GoWalker<'_> {
    /// Dispatch by node kind; handlers own their subtrees
    fn walk_tree(&mut self, node: Node) {
        match node.kind() {
            "import_declaration" => self.extract_imports(node),
            "function_declaration" => self.extract_function(node),
            "method_declaration" => self.extract_method(node),
            "type_declaration" => self.extract_type_declaration(node),
            "const_declaration" => self.extract_constants(node),
            "var_declaration" => self.extract_variables(node),
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk_tree(child);
                }
            }
        }
    }

    fn add_export(&mut self, name: &str, kind: ExportKind, position: Position) {
        self.model.exports.push(Export {
            name: name.to_string(),
            kind,
            is_default: false,
            is_type_export: matches!(
                kind,
                ExportKind::Struct | ExportKind::Interface | ExportKind::Type
            ),
            is_namespace: false,
            position,
        });
    }
}

/// Python extractor producing a StructuralModel from Python source
///
/// This module is organized into focused sub-modules:
/// - types: Class extraction (bases, generics, attributes, methods)
/// - functions: Function and method extraction
/// - signatures: Parameter and annotation extraction
/// - decorators: Decorator handling (static/class methods, properties)
/// - imports: Import statement handling
/// - assignments: Module-level variables, constants and `__all__`
pub(crate) mod assignments;
pub(crate) mod decorators;
pub(crate) mod functions;
pub(crate) mod imports;
pub(crate) mod signatures;
pub(crate) mod types;

use crate::errors::ExtractError;
use crate::extractors::base::{
    BaseExtractor, Export, ExportKind, Position, StructuralModel,
};
use crate::extractors::LanguageExtractor;
use tree_sitter::Node;

/// Python extractor; visibility is `_`-prefix based with `__init__` always public
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> &'static str {
        "Python"
    }

    fn parse(&self, content: &str, file_path: &str) -> Result<StructuralModel, ExtractError> {
        let base = BaseExtractor::new("Python", file_path, content);
        let grammar = crate::language::get_tree_sitter_language("python")
            .map_err(|e| base.grammar_error(e))?;
        let tree = base.parse(&grammar)?;

        let mut walker = PythonWalker {
            model: StructuralModel::new("Python", file_path),
            base,
            export_candidates: Vec::new(),
            dunder_all: None,
        };
        walker.traverse_tree(tree.root_node());
        Ok(walker.finish())
    }
}

/// Single-pass walker over one Python module
pub(crate) struct PythonWalker<'a> {
    pub(crate) base: BaseExtractor<'a>,
    pub(crate) model: StructuralModel,
    /// Public module-level declarations in source order
    pub(crate) export_candidates: Vec<Export>,
    /// Names listed in `__all__`, when the module declares it
    pub(crate) dunder_all: Option<Vec<(String, Position)>>,
}

impl PythonWalker<'_> {
    fn traverse_tree(&mut self, node: Node) {
        match node.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                imports::extract_imports(self, node);
            }
            "function_definition" => {
                functions::extract_function(self, node);
            }
            "class_definition" => {
                types::extract_class(self, node, &[], true);
            }
            "decorated_definition" => {
                decorators::extract_decorated_definition(self, node);
            }
            "expression_statement" => {
                assignments::extract_module_statement(self, node);
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.traverse_tree(child);
                }
            }
        }
    }

    pub(crate) fn add_export_candidate(&mut self, name: &str, kind: ExportKind, position: Position) {
        self.export_candidates.push(Export {
            name: name.to_string(),
            kind,
            is_default: false,
            is_type_export: false,
            is_namespace: false,
            position,
        });
    }

    /// `__all__` is authoritative when present; otherwise every public
    /// module-level declaration is exported
    fn finish(mut self) -> StructuralModel {
        match self.dunder_all.take() {
            Some(names) => {
                for (name, position) in names {
                    let kind = self.kind_of(&name);
                    self.model.exports.push(Export {
                        name,
                        kind,
                        is_default: false,
                        is_type_export: false,
                        is_namespace: false,
                        position,
                    });
                }
            }
            None => self.model.exports = std::mem::take(&mut self.export_candidates),
        }
        self.model
    }

    fn kind_of(&self, name: &str) -> ExportKind {
        if self.model.functions.iter().any(|f| f.name == name) {
            ExportKind::Function
        } else if self.model.types.iter().any(|t| t.name == name) {
            ExportKind::Class
        } else if self.model.constants.iter().any(|c| c.name == name) {
            ExportKind::Constant
        } else if self.model.variables.iter().any(|v| v.name == name) {
            ExportKind::Variable
        } else if self
            .model
            .imports
            .iter()
            .any(|i| i.names.iter().any(|n| n == name))
        {
            ExportKind::Module
        } else {
            ExportKind::Value
        }
    }
}

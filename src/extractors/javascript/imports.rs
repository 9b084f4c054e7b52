use crate::extractors::base::tree_methods::{child_of_kind, has_child_of_kind};
use crate::extractors::base::{unquote, Import};
use tree_sitter::Node;

/// ES module, CommonJS and dynamic imports
impl super::JsWalker<'_> {
    /// `import x, { a as b } from "m"`, `import * as ns from "m"`, `import "m"`
    pub(super) fn extract_import(&mut self, node: Node) {
        let Some(source) = self.base.field_text(&node, "source") else {
            return;
        };

        let mut import = Import {
            path: unquote(&source),
            is_type_import: has_child_of_kind(&node, "type"),
            position: self.base.position(&node),
            ..Default::default()
        };

        if let Some(clause) = child_of_kind(&node, "import_clause") {
            let mut cursor = clause.walk();
            for part in clause.named_children(&mut cursor) {
                match part.kind() {
                    // default binding
                    "identifier" => import.names.push(self.base.get_node_text(&part)),
                    "namespace_import" => {
                        if let Some(binding) = child_of_kind(&part, "identifier") {
                            let alias = self.base.get_node_text(&binding);
                            import.is_namespace = true;
                            import.names.push(alias.clone());
                            import.alias = alias;
                        }
                    }
                    "named_imports" => {
                        let mut inner = part.walk();
                        for specifier in part.named_children(&mut inner) {
                            if specifier.kind() != "import_specifier" {
                                continue;
                            }
                            let local = self
                                .base
                                .field_text(&specifier, "alias")
                                .or_else(|| self.base.field_text(&specifier, "name"));
                            if let Some(local) = local {
                                import.names.push(local);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        self.model.imports.push(import);
    }

    /// Recognize `require("m")` and `import("m")` (optionally awaited);
    /// `binding` names the declarator pattern the value is assigned to
    pub(super) fn import_from_call(&self, value: Node, binding: Option<Node>) -> Option<Import> {
        let call = if value.kind() == "await_expression" {
            value.named_child(0)?
        } else {
            value
        };
        if call.kind() != "call_expression" {
            return None;
        }

        let callee = call.child_by_field_name("function")?;
        let is_dynamic = match callee.kind() {
            "import" => true,
            "identifier" if self.base.get_node_text(&callee) == "require" => false,
            _ => return None,
        };

        let arguments = call.child_by_field_name("arguments")?;
        let first = arguments.named_child(0)?;
        if !matches!(first.kind(), "string" | "template_string") {
            return None;
        }

        let names = binding.map(|b| self.pattern_names(b)).unwrap_or_default();
        Some(Import {
            path: unquote(&self.base.get_node_text(&first)),
            is_namespace: binding.is_some_and(|b| b.kind() == "identifier"),
            names,
            is_dynamic,
            position: self.base.position(&call),
            ..Default::default()
        })
    }
}

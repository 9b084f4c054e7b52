use super::functions::FUNCTION_VALUE_KINDS;
use crate::extractors::base::tree_methods::has_child_of_kind;
use crate::extractors::base::{Constant, Variable};
use tree_sitter::Node;

/// `const`/`let`/`var` declarations
impl super::JsWalker<'_> {
    /// Each declarator becomes one of: a Function (callable value), a Type
    /// (`class` expression), an Import (`require`/`import()`), a Constant
    /// (`const`) or a Variable
    pub(super) fn extract_variable_declaration(&mut self, node: Node) {
        let is_const = has_child_of_kind(&node, "const");
        let mut cursor = node.walk();

        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(pattern) = declarator.child_by_field_name("name") else {
                continue;
            };
            let value = declarator.child_by_field_name("value");

            if let Some(value) = value {
                if pattern.kind() == "identifier" && FUNCTION_VALUE_KINDS.contains(&value.kind()) {
                    let name = self.base.get_node_text(&pattern);
                    self.extract_function_value(name, value, declarator);
                    continue;
                }
                if pattern.kind() == "identifier" && value.kind() == "class" {
                    let name = self.base.get_node_text(&pattern);
                    self.extract_class_as(value, name);
                    continue;
                }
                if let Some(import) = self.import_from_call(value, Some(pattern)) {
                    self.model.imports.push(import);
                    continue;
                }
            }

            let type_name = declarator
                .child_by_field_name("type")
                .map(|t| self.annotation_text(t))
                .unwrap_or_default();
            let position = self.base.position(&declarator);

            for name in self.pattern_names(pattern) {
                if is_const {
                    self.model.constants.push(Constant {
                        name,
                        type_name: type_name.clone(),
                        value: value
                            .map(|v| self.base.get_node_text(&v))
                            .unwrap_or_default(),
                        is_public: true,
                        position,
                    });
                } else {
                    self.model.variables.push(Variable {
                        name,
                        type_name: type_name.clone(),
                        is_public: true,
                        position,
                    });
                }
            }
        }
    }

    /// Top-level expression statements: CommonJS exports and bare
    /// side-effect `require("m")` / `import("m")` calls
    pub(super) fn extract_expression_statement(&mut self, node: Node) {
        let Some(expression) = node.named_child(0) else {
            return;
        };
        match expression.kind() {
            "assignment_expression" => {
                self.extract_commonjs_export(expression);
            }
            "call_expression" | "await_expression" => {
                if let Some(import) = self.import_from_call(expression, None) {
                    self.model.imports.push(import);
                }
            }
            _ => {}
        }
    }
}

use crate::extractors::base::tree_methods::{child_of_kind, has_child_of_kind};
use crate::extractors::base::{Export, ExportKind, Position};
use tree_sitter::Node;

/// ES module and CommonJS exports
impl super::JsWalker<'_> {
    /// Record the exports an `export` statement declares, then visit the
    /// wrapped declaration so it is extracted exactly once
    pub(super) fn extract_export(&mut self, node: Node) {
        let position = self.base.position(&node);
        let is_default = has_child_of_kind(&node, "default");
        let is_type_only = has_child_of_kind(&node, "type");

        if let Some(declaration) = node.child_by_field_name("declaration") {
            for (name, kind) in self.declared_names(declaration) {
                self.push_export(Export {
                    is_type_export: matches!(
                        kind,
                        ExportKind::Interface | ExportKind::Type
                    ),
                    name,
                    kind,
                    is_default,
                    is_namespace: false,
                    position,
                });
            }
            self.visit_node(declaration);
            return;
        }

        // export default class [Name] { ... }
        if let Some(class_node) = node
            .child_by_field_name("value")
            .filter(|v| v.kind() == "class")
        {
            let name = self
                .base
                .field_text(&class_node, "name")
                .unwrap_or_else(|| "default".to_string());
            self.push_export(Export {
                name: name.clone(),
                kind: ExportKind::Class,
                is_default: true,
                is_type_export: false,
                is_namespace: false,
                position,
            });
            self.extract_class_as(class_node, name);
            return;
        }

        // export default <expression>
        if let Some(value) = node.child_by_field_name("value") {
            let name = if value.kind() == "identifier" {
                self.base.get_node_text(&value)
            } else {
                "default".to_string()
            };
            self.push_export(Export {
                name,
                kind: ExportKind::Value,
                is_default: true,
                is_type_export: false,
                is_namespace: false,
                position,
            });
            return;
        }

        // export * as ns from "m"
        if let Some(namespace) = child_of_kind(&node, "namespace_export") {
            let name = namespace
                .named_child(0)
                .map(|n| crate::extractors::base::unquote(&self.base.get_node_text(&n)))
                .unwrap_or_else(|| "*".to_string());
            self.push_namespace_export(name, position);
            return;
        }

        // export { a, b as c } [from "m"]
        if let Some(clause) = child_of_kind(&node, "export_clause") {
            let mut cursor = clause.walk();
            for specifier in clause.named_children(&mut cursor) {
                if specifier.kind() != "export_specifier" {
                    continue;
                }
                let exported = self
                    .base
                    .field_text(&specifier, "alias")
                    .or_else(|| self.base.field_text(&specifier, "name"));
                let Some(name) = exported.map(|n| crate::extractors::base::unquote(&n)) else {
                    continue;
                };
                self.push_export(Export {
                    is_default: name == "default",
                    name,
                    kind: ExportKind::Value,
                    is_type_export: is_type_only,
                    is_namespace: false,
                    position,
                });
            }
            return;
        }

        // export * from "m"
        if has_child_of_kind(&node, "*") {
            self.push_namespace_export("*".to_string(), position);
        }
    }

    /// Names and kinds introduced by an exported declaration
    fn declared_names(&self, declaration: Node) -> Vec<(String, ExportKind)> {
        let kind = match declaration.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                ExportKind::Function
            }
            "class_declaration" | "abstract_class_declaration" => ExportKind::Class,
            "interface_declaration" => ExportKind::Interface,
            "type_alias_declaration" => ExportKind::Type,
            "enum_declaration" => ExportKind::Enum,
            "internal_module" | "module" => ExportKind::Module,
            // export declare function f(): void;
            "ambient_declaration" => {
                let mut cursor = declaration.walk();
                let inner: Vec<Node> = declaration.named_children(&mut cursor).collect();
                return inner
                    .into_iter()
                    .flat_map(|d| self.declared_names(d))
                    .collect();
            }
            "lexical_declaration" | "variable_declaration" => {
                let kind = if has_child_of_kind(&declaration, "const") {
                    ExportKind::Constant
                } else {
                    ExportKind::Variable
                };
                let mut cursor = declaration.walk();
                let names: Vec<(String, ExportKind)> = declaration
                    .named_children(&mut cursor)
                    .filter(|d| d.kind() == "variable_declarator")
                    .filter_map(|d| d.child_by_field_name("name"))
                    .flat_map(|pattern| self.pattern_names(pattern))
                    .map(|name| (name, kind))
                    .collect();
                return names;
            }
            _ => return Vec::new(),
        };

        self.base
            .field_text(&declaration, "name")
            .map(|name| vec![(name, kind)])
            .unwrap_or_default()
    }

    fn push_namespace_export(&mut self, name: String, position: Position) {
        self.push_export(Export {
            name,
            kind: ExportKind::Module,
            is_default: false,
            is_type_export: false,
            is_namespace: true,
            position,
        });
    }

    /// Overload signatures export one function name several times; keep the first
    fn push_export(&mut self, export: Export) {
        let duplicate = export.kind == ExportKind::Function
            && self
                .model
                .exports
                .iter()
                .any(|e| e.kind == ExportKind::Function && e.name == export.name);
        if !duplicate {
            self.model.exports.push(export);
        }
    }

    /// `module.exports = ...`, `module.exports.x = ...`, `exports.x = ...`
    pub(super) fn extract_commonjs_export(&mut self, assignment: Node) -> bool {
        let Some(left) = assignment.child_by_field_name("left") else {
            return false;
        };
        if left.kind() != "member_expression" {
            return false;
        }
        let target = self.base.get_node_text(&left);
        let position = self.base.position(&assignment);
        let right = assignment.child_by_field_name("right");

        if target == "module.exports" {
            match right {
                Some(value) if value.kind() == "object" => {
                    let mut cursor = value.walk();
                    for entry in value.named_children(&mut cursor) {
                        let name = match entry.kind() {
                            "shorthand_property_identifier" => self.base.get_node_text(&entry),
                            "pair" | "method_definition" => {
                                let Some(key) = entry
                                    .child_by_field_name("key")
                                    .or_else(|| entry.child_by_field_name("name"))
                                else {
                                    continue;
                                };
                                crate::extractors::base::unquote(&self.base.get_node_text(&key))
                            }
                            _ => continue,
                        };
                        self.push_commonjs(name, false, position);
                    }
                }
                Some(value) if value.kind() == "identifier" => {
                    let name = self.base.get_node_text(&value);
                    self.push_commonjs(name, true, position);
                }
                _ => self.push_commonjs("default".to_string(), true, position),
            }
            return true;
        }

        let property = target
            .strip_prefix("module.exports.")
            .or_else(|| target.strip_prefix("exports."));
        match property {
            Some(name) if !name.contains('.') => {
                self.push_commonjs(name.to_string(), false, position);
                true
            }
            _ => false,
        }
    }

    fn push_commonjs(&mut self, name: String, is_default: bool, position: Position) {
        self.push_export(Export {
            name,
            kind: ExportKind::Value,
            is_default,
            is_type_export: false,
            is_namespace: false,
            position,
        });
    }
}

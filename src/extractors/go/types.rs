use super::helpers::strip_type_decorations;
use crate::extractors::base::tree_methods::{child_of_kind, has_child_of_kind};
use crate::extractors::base::visibility::go_is_public;
use crate::extractors::base::{ExportKind, Method, MethodKind, Property, TypeDecl, TypeKind};
use tree_sitter::Node;

/// Type declaration extraction for Go (structs, interfaces, named types, aliases)
impl super::GoWalker<'_> {
    pub(super) fn extract_type_declaration(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_spec" => self.extract_type_spec(child, false),
                "type_alias" => self.extract_type_spec(child, true),
                _ => {}
            }
        }
    }

    fn extract_type_spec(&mut self, spec: Node, is_alias: bool) {
        let Some(name) = self.base.field_text(&spec, "name") else {
            return;
        };
        let type_node = spec.child_by_field_name("type");

        let kind = match type_node.map(|t| t.kind()) {
            _ if is_alias => TypeKind::Alias,
            Some("struct_type") => TypeKind::Struct,
            Some("interface_type") => TypeKind::Interface,
            _ => TypeKind::Type,
        };

        let mut decl = TypeDecl {
            is_public: go_is_public(&name),
            kind,
            generic_parameters: spec
                .child_by_field_name("type_parameters")
                .map(|tp| self.type_parameter_names(tp))
                .unwrap_or_default(),
            position: self.base.position(&spec),
            name,
            ..Default::default()
        };

        if let Some(type_node) = type_node {
            match kind {
                TypeKind::Struct => decl.properties = self.extract_struct_fields(type_node),
                TypeKind::Interface => self.extract_interface_body(type_node, &mut decl),
                _ => decl.parent = self.base.get_node_text(&type_node),
            }
        }

        if decl.is_public {
            let export_kind = match kind {
                TypeKind::Struct => ExportKind::Struct,
                TypeKind::Interface => ExportKind::Interface,
                _ => ExportKind::Type,
            };
            self.add_export(&decl.name, export_kind, decl.position);
        }
        self.model.types.push(decl);
    }

    fn extract_struct_fields(&self, struct_type: Node) -> Vec<Property> {
        let Some(field_list) = child_of_kind(&struct_type, "field_declaration_list") else {
            return Vec::new();
        };

        let mut properties = Vec::new();
        let mut cursor = field_list.walk();
        for field in field_list.named_children(&mut cursor) {
            if field.kind() != "field_declaration" {
                continue;
            }
            let type_text = self.base.field_text(&field, "type").unwrap_or_default();
            let position = self.base.position(&field);

            let mut name_cursor = field.walk();
            let names: Vec<String> = field
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| self.base.get_node_text(&n))
                .collect();

            if names.is_empty() {
                // Embedded field: named after its type
                let type_name = if has_child_of_kind(&field, "*") {
                    format!("*{}", type_text)
                } else {
                    type_text.clone()
                };
                let stripped = strip_type_decorations(&type_text);
                let name = stripped.rsplit('.').next().unwrap_or(&stripped).to_string();
                properties.push(Property {
                    is_public: go_is_public(&name),
                    name,
                    type_name,
                    position,
                    ..Default::default()
                });
                continue;
            }

            for name in names {
                properties.push(Property {
                    is_public: go_is_public(&name),
                    name,
                    type_name: type_text.clone(),
                    position,
                    ..Default::default()
                });
            }
        }
        properties
    }

    /// Interface members: method signatures become abstract methods of the
    /// interface, embedded interfaces and constraints go to `implements`
    fn extract_interface_body(&mut self, interface_type: Node, decl: &mut TypeDecl) {
        let mut cursor = interface_type.walk();
        for member in interface_type.named_children(&mut cursor) {
            match member.kind() {
                "method_elem" | "method_spec" => {
                    let Some(name) = self.base.field_text(&member, "name") else {
                        continue;
                    };
                    let method = Method {
                        is_public: go_is_public(&name),
                        name,
                        belongs_to: decl.name.clone(),
                        parameters: member
                            .child_by_field_name("parameters")
                            .map(|p| self.extract_parameter_list(p))
                            .unwrap_or_default(),
                        return_type: member
                            .child_by_field_name("result")
                            .map(|r| self.render_result(r))
                            .unwrap_or_default(),
                        is_abstract: true,
                        kind: MethodKind::Method,
                        position: self.base.position(&member),
                        ..Default::default()
                    };
                    self.model.methods.push(method.clone());
                    decl.methods.push(method);
                }
                "type_elem" | "constraint_elem" | "interface_type_name" => {
                    decl.implements.push(self.base.get_node_text(&member));
                }
                _ => {}
            }
        }
    }
}

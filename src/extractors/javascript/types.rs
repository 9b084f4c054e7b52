use crate::extractors::base::tree_methods::{child_of_kind, children_of_kind};
use crate::extractors::base::{Method, Property, TypeDecl, TypeKind};
use tree_sitter::Node;

/// Classes and TypeScript type declarations
impl super::JsWalker<'_> {
    /// `class`/`abstract class` declarations; members are recorded on the
    /// type and at file scope
    pub(super) fn extract_class(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };
        self.extract_class_as(node, name);
    }

    /// Class declaration or `class` expression, recorded under `name`
    /// (the binding name, or `default` for an anonymous default export)
    pub(super) fn extract_class_as(&mut self, node: Node, name: String) {
        // `@Dec() export class X` attaches the decorator to the export statement
        let mut decorator_nodes = Vec::new();
        if let Some(parent) = node.parent().filter(|p| p.kind() == "export_statement") {
            decorator_nodes.extend(children_of_kind(&parent, "decorator"));
        }
        decorator_nodes.extend(children_of_kind(&node, "decorator"));

        let mut decl = TypeDecl {
            name,
            kind: TypeKind::Class,
            is_public: true,
            generic_parameters: self.type_parameter_names(node),
            decorators: decorator_nodes
                .iter()
                .map(|d| self.base.get_node_text(d).trim_start_matches('@').to_string())
                .collect(),
            position: self.base.position(&node),
            ..Default::default()
        };

        if let Some(heritage) = child_of_kind(&node, "class_heritage") {
            self.read_heritage(heritage, &mut decl);
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_definition" | "abstract_method_signature" | "method_signature" => {
                        if let Some(method) = self.extract_method_definition(member, &decl.name) {
                            self.push_method(&mut decl, method);
                        }
                    }
                    "field_definition" | "public_field_definition" => {
                        if let Some(property) = self.extract_field(member) {
                            decl.properties.push(property);
                        }
                    }
                    _ => {}
                }
            }
        }

        self.model.types.push(decl);
    }

    /// JavaScript: `extends <expr>`; TypeScript: extends/implements clauses
    fn read_heritage(&self, heritage: Node, decl: &mut TypeDecl) {
        let extends = child_of_kind(&heritage, "extends_clause");
        let implements = child_of_kind(&heritage, "implements_clause");

        if extends.is_none() && implements.is_none() {
            if let Some(parent) = heritage.named_child(0) {
                decl.parent = self.base.get_node_text(&parent);
            }
            return;
        }

        if let Some(extends) = extends {
            decl.parent = extends
                .child_by_field_name("value")
                .map(|v| self.base.get_node_text(&v))
                .unwrap_or_default();
        }
        if let Some(implements) = implements {
            let mut cursor = implements.walk();
            decl.implements = implements
                .named_children(&mut cursor)
                .map(|t| self.base.get_node_text(&t))
                .collect();
        }
    }

    fn extract_field(&self, member: Node) -> Option<Property> {
        let name_node = member
            .child_by_field_name("property")
            .or_else(|| member.child_by_field_name("name"))?;
        let raw_name = self.base.get_node_text(&name_node);
        let (name, is_public) = self.member_visibility(member, &raw_name);

        Some(Property {
            name,
            type_name: member
                .child_by_field_name("type")
                .map(|t| self.annotation_text(t))
                .unwrap_or_default(),
            default_value: self.base.field_text(&member, "value").unwrap_or_default(),
            is_public,
            is_static: self.has_modifier(member, "static"),
            position: self.base.position(&member),
        })
    }

    fn push_method(&mut self, decl: &mut TypeDecl, method: Method) {
        self.model.methods.push(method.clone());
        decl.methods.push(method);
    }

    /// `interface Name<T> extends A, B { ... }`
    pub(super) fn extract_interface(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };
        let mut decl = TypeDecl {
            name,
            kind: TypeKind::Interface,
            is_public: true,
            generic_parameters: self.type_parameter_names(node),
            position: self.base.position(&node),
            ..Default::default()
        };

        if let Some(extends) = child_of_kind(&node, "extends_type_clause") {
            let mut cursor = extends.walk();
            let mut bases = extends
                .named_children(&mut cursor)
                .map(|t| self.base.get_node_text(&t))
                .collect::<Vec<_>>()
                .into_iter();
            decl.parent = bases.next().unwrap_or_default();
            decl.implements = bases.collect();
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_signature" => {
                        if let Some(method) = self.extract_method_definition(member, &decl.name) {
                            self.push_method(&mut decl, method);
                        }
                    }
                    "property_signature" => {
                        if let Some(property) = self.extract_field(member) {
                            decl.properties.push(property);
                        }
                    }
                    _ => {}
                }
            }
        }

        self.model.types.push(decl);
    }

    /// `type Name<T> = ...`
    pub(super) fn extract_type_alias(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };
        self.model.types.push(TypeDecl {
            name,
            kind: TypeKind::Alias,
            is_public: true,
            parent: self.base.field_text(&node, "value").unwrap_or_default(),
            generic_parameters: self.type_parameter_names(node),
            position: self.base.position(&node),
            ..Default::default()
        });
    }

    /// `enum Name { A, B = 2 }`; members become properties
    pub(super) fn extract_enum(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };
        let mut decl = TypeDecl {
            name,
            kind: TypeKind::Enum,
            is_public: true,
            position: self.base.position(&node),
            ..Default::default()
        };

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                let (name, value) = match member.kind() {
                    "enum_assignment" => (
                        self.base.field_text(&member, "name").unwrap_or_default(),
                        self.base.field_text(&member, "value").unwrap_or_default(),
                    ),
                    "property_identifier" | "string" => {
                        (self.base.get_node_text(&member), String::new())
                    }
                    _ => continue,
                };
                decl.properties.push(Property {
                    name: crate::extractors::base::unquote(&name),
                    default_value: value,
                    is_public: true,
                    is_static: true,
                    position: self.base.position(&member),
                    ..Default::default()
                });
            }
        }

        self.model.types.push(decl);
    }
}

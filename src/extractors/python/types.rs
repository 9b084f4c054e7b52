use super::decorators::decorator_names;
use super::functions::extract_method;
use super::PythonWalker;
use crate::extractors::base::visibility::python_is_public;
use crate::extractors::base::{ExportKind, Method, Property, TypeDecl, TypeKind};
use tree_sitter::Node;

const ENUM_BASES: &[&str] = &["Enum", "IntEnum", "StrEnum", "Flag", "IntFlag"];

/// Extract a class, its members, and (for nested classes) their own types
///
/// The class's methods are recorded both on the TypeDecl and at file scope
/// with `belongs_to` set to the class name.
pub(crate) fn extract_class(
    walker: &mut PythonWalker,
    node: Node,
    decorators: &[String],
    top_level: bool,
) {
    let Some(name) = walker.base.field_text(&node, "name") else {
        return;
    };

    let mut decl = TypeDecl {
        is_public: python_is_public(&name),
        decorators: decorators.to_vec(),
        position: walker.base.position(&node),
        name,
        ..Default::default()
    };

    let mut bases = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            match base.kind() {
                // metaclass=..., total=False
                "keyword_argument" | "comment" => {}
                "subscript" if subscript_value(walker, base) == "Generic" => {
                    decl.generic_parameters.extend(subscript_arguments(walker, base));
                }
                _ => bases.push(walker.base.get_node_text(&base)),
            }
        }
    }
    if let Some(type_parameters) = node.child_by_field_name("type_parameters") {
        let mut cursor = type_parameters.walk();
        decl.generic_parameters.extend(
            type_parameters
                .named_children(&mut cursor)
                .map(|p| walker.base.get_node_text(&p)),
        );
    }

    decl.kind = classify(&bases);
    let mut bases = bases.into_iter();
    decl.parent = bases.next().unwrap_or_default();
    decl.implements = bases.collect();

    if top_level && decl.is_public {
        walker.add_export_candidate(&decl.name, ExportKind::Class, decl.position);
    }

    // Reserve the slot so nested classes land after their parent
    let index = walker.model.types.len();
    if let Some(body) = node.child_by_field_name("body") {
        extract_class_body(walker, body, &mut decl);
    }
    walker.model.types.insert(index, decl);
}

fn classify(bases: &[String]) -> TypeKind {
    let root = |b: &String| -> String {
        let unsubscripted = b.split('[').next().unwrap_or(b);
        unsubscripted.rsplit('.').next().unwrap_or(unsubscripted).to_string()
    };
    if bases.iter().any(|b| root(b) == "Protocol") {
        TypeKind::Interface
    } else if bases.iter().any(|b| ENUM_BASES.contains(&root(b).as_str())) {
        TypeKind::Enum
    } else {
        TypeKind::Class
    }
}

fn subscript_value(walker: &PythonWalker, subscript: Node) -> String {
    walker.base.field_text(&subscript, "value").unwrap_or_default()
}

fn subscript_arguments(walker: &PythonWalker, subscript: Node) -> Vec<String> {
    let mut cursor = subscript.walk();
    let arguments: Vec<String> = subscript
        .children_by_field_name("subscript", &mut cursor)
        .map(|n| walker.base.get_node_text(&n))
        .collect();
    arguments
}

fn extract_class_body(walker: &mut PythonWalker, body: Node, decl: &mut TypeDecl) {
    let is_interface = decl.kind == TypeKind::Interface;
    let mut cursor = body.walk();

    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "function_definition" => {
                if let Some(method) = extract_method(walker, member, &decl.name, is_interface, &[]) {
                    collect_instance_attributes(walker, member, &method, decl);
                    push_method(walker, decl, method);
                }
            }
            "decorated_definition" => {
                let decorators = decorator_names(walker, member);
                let Some(definition) = member.child_by_field_name("definition") else {
                    continue;
                };
                match definition.kind() {
                    "function_definition" => {
                        if let Some(method) =
                            extract_method(walker, definition, &decl.name, is_interface, &decorators)
                        {
                            push_method(walker, decl, method);
                        }
                    }
                    "class_definition" => extract_class(walker, definition, &decorators, false),
                    _ => {}
                }
            }
            "class_definition" => extract_class(walker, member, &[], false),
            "expression_statement" => {
                let mut inner = member.walk();
                for assignment in member.named_children(&mut inner) {
                    if assignment.kind() == "assignment" {
                        class_attribute(walker, assignment, decl);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_method(walker: &mut PythonWalker, decl: &mut TypeDecl, method: Method) {
    walker.model.methods.push(method.clone());
    decl.methods.push(method);
}

/// `name = value` or `name: type = value` directly in the class body
fn class_attribute(walker: &PythonWalker, assignment: Node, decl: &mut TypeDecl) {
    let Some(left) = assignment.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "identifier" {
        return;
    }
    let name = walker.base.get_node_text(&left);
    push_property(
        decl,
        Property {
            is_public: python_is_public(&name),
            name,
            type_name: walker.base.field_text(&assignment, "type").unwrap_or_default(),
            default_value: walker.base.field_text(&assignment, "right").unwrap_or_default(),
            is_static: false,
            position: walker.base.position(&assignment),
        },
    );
}

/// `self.x = ...` statements at the top level of `__init__`
fn collect_instance_attributes(
    walker: &PythonWalker,
    function: Node,
    method: &Method,
    decl: &mut TypeDecl,
) {
    if !method.is_constructor {
        return;
    }
    let Some(body) = function.child_by_field_name("body") else {
        return;
    };

    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        if statement.kind() != "expression_statement" {
            continue;
        }
        let mut inner = statement.walk();
        for assignment in statement.named_children(&mut inner) {
            if assignment.kind() != "assignment" {
                continue;
            }
            let Some(left) = assignment.child_by_field_name("left") else {
                continue;
            };
            if left.kind() != "attribute"
                || walker.base.field_text(&left, "object").as_deref() != Some("self")
            {
                continue;
            }
            let Some(name) = walker.base.field_text(&left, "attribute") else {
                continue;
            };
            push_property(
                decl,
                Property {
                    is_public: python_is_public(&name),
                    name,
                    type_name: walker.base.field_text(&assignment, "type").unwrap_or_default(),
                    default_value: String::new(),
                    is_static: false,
                    position: walker.base.position(&assignment),
                },
            );
        }
    }
}

fn push_property(decl: &mut TypeDecl, property: Property) {
    if decl.properties.iter().any(|p| p.name == property.name) {
        return;
    }
    decl.properties.push(property);
}

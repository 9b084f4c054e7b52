use super::PythonWalker;
use crate::extractors::base::visibility::python_is_public;
use crate::extractors::base::{unquote, Constant, ExportKind, Position, Variable};
use tree_sitter::Node;

/// Module-level expression statement: assignments and `__all__` updates
pub(crate) fn extract_module_statement(walker: &mut PythonWalker, statement: Node) {
    let mut cursor = statement.walk();
    for child in statement.named_children(&mut cursor) {
        match child.kind() {
            "assignment" => extract_assignment(walker, child),
            "augmented_assignment" => {
                if walker.base.field_text(&child, "left").as_deref() == Some("__all__") {
                    if let Some(right) = child.child_by_field_name("right") {
                        extend_dunder_all(walker, right);
                    }
                }
            }
            _ => {}
        }
    }
}

fn extract_assignment(walker: &mut PythonWalker, assignment: Node) {
    let Some(left) = assignment.child_by_field_name("left") else {
        return;
    };
    let right = assignment.child_by_field_name("right");
    let type_name = walker
        .base
        .field_text(&assignment, "type")
        .unwrap_or_default();
    let position = walker.base.position(&assignment);

    match left.kind() {
        "identifier" => {
            let name = walker.base.get_node_text(&left);
            if name == "__all__" {
                walker.dunder_all = Some(Vec::new());
                if let Some(right) = right {
                    extend_dunder_all(walker, right);
                }
                return;
            }
            let value = right
                .map(|r| walker.base.get_node_text(&r))
                .unwrap_or_default();
            record_binding(walker, name, type_name, value, position);
        }
        // a, b = 1, 2
        "pattern_list" | "tuple_pattern" => {
            let names = named_texts(walker, left);
            let values = right
                .filter(|r| matches!(r.kind(), "expression_list" | "tuple"))
                .map(|r| named_texts(walker, r))
                .unwrap_or_default();
            for (index, name) in names.into_iter().enumerate() {
                let value = values.get(index).cloned().unwrap_or_default();
                record_binding(walker, name, String::new(), value, position);
            }
        }
        _ => {}
    }
}

fn named_texts(walker: &PythonWalker, node: Node) -> Vec<String> {
    let mut cursor = node.walk();
    let texts: Vec<String> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .map(|c| walker.base.get_node_text(&c))
        .collect();
    texts
}

fn record_binding(
    walker: &mut PythonWalker,
    name: String,
    type_name: String,
    value: String,
    position: Position,
) {
    let is_public = python_is_public(&name);
    if is_constant(&name, &type_name) {
        if is_public {
            walker.add_export_candidate(&name, ExportKind::Constant, position);
        }
        walker.model.constants.push(Constant {
            name,
            type_name,
            value,
            is_public,
            position,
        });
    } else {
        if is_public {
            walker.add_export_candidate(&name, ExportKind::Variable, position);
        }
        walker.model.variables.push(Variable {
            name,
            type_name,
            is_public,
            position,
        });
    }
}

/// UPPER_SNAKE names of two or more characters, or a `Final` annotation.
/// Single uppercase letters are conventionally type variables.
fn is_constant(name: &str, type_name: &str) -> bool {
    if type_name == "Final" || type_name.starts_with("Final[") || type_name.ends_with(".Final") {
        return true;
    }
    let bare = name.trim_start_matches('_');
    bare.chars().count() >= 2
        && bare.chars().any(|c| c.is_ascii_uppercase())
        && bare
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Append string literals from a list/tuple to `__all__`
fn extend_dunder_all(walker: &mut PythonWalker, value: Node) {
    let position = walker.base.position(&value);
    let mut names = Vec::new();
    let mut cursor = value.walk();
    for element in value.named_children(&mut cursor) {
        if element.kind() == "string" {
            names.push((unquote(&walker.base.get_node_text(&element)), position));
        }
    }
    walker.dunder_all.get_or_insert_with(Vec::new).extend(names);
}

#[cfg(test)]
mod tests {
    use super::is_constant;

    #[test]
    fn constant_naming_rules() {
        assert!(is_constant("MAX_RETRIES", ""));
        assert!(is_constant("_INTERNAL_LIMIT", ""));
        assert!(is_constant("HTTP2", ""));
        assert!(is_constant("limit", "Final[int]"));
        assert!(is_constant("limit", "typing.Final"));
        assert!(!is_constant("T", ""));
        assert!(!is_constant("Config", ""));
        assert!(!is_constant("__", ""));
    }
}

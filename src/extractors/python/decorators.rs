use super::{functions, types, PythonWalker};
use tree_sitter::Node;

/// Decorator source text without the leading `@`, in source order
pub(crate) fn decorator_names(walker: &PythonWalker, decorated: Node) -> Vec<String> {
    let mut cursor = decorated.walk();
    decorated
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .map(|d| {
            walker
                .base
                .get_node_text(&d)
                .trim_start_matches('@')
                .trim()
                .to_string()
        })
        .collect()
}

/// Whether `name` appears as a decorator, bare or qualified (`abc.abstractmethod`)
pub(crate) fn has_decorator(decorators: &[String], name: &str) -> bool {
    decorators.iter().any(|d| {
        let callee = d.split('(').next().unwrap_or(d).trim();
        callee == name || callee.rsplit('.').next() == Some(name)
    })
}

/// `@size.setter` → Some("size")
pub(crate) fn setter_target(decorators: &[String]) -> Option<&str> {
    decorators.iter().find_map(|d| d.strip_suffix(".setter"))
}

/// Module-level decorated function or class
pub(crate) fn extract_decorated_definition(walker: &mut PythonWalker, node: Node) {
    let decorators = decorator_names(walker, node);
    let Some(definition) = node.child_by_field_name("definition") else {
        return;
    };
    match definition.kind() {
        "function_definition" => functions::extract_function(walker, definition),
        "class_definition" => types::extract_class(walker, definition, &decorators, true),
        _ => {}
    }
}

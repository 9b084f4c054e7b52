use super::decorators::{has_decorator, setter_target};
use super::signatures::extract_parameters;
use super::PythonWalker;
use crate::extractors::base::tree_methods::{contains_kind, has_child_of_kind};
use crate::extractors::base::visibility::python_is_public;
use crate::extractors::base::{ExportKind, Function, Method, MethodKind, Parameter};
use tree_sitter::Node;

/// Scopes a `yield` must not be attributed across
const NESTED_SCOPES: &[&str] = &["function_definition", "lambda", "class_definition"];

/// Fields shared by functions and methods
struct Callable {
    name: String,
    parameters: Vec<Parameter>,
    return_type: String,
    is_async: bool,
    is_generator: bool,
}

fn read_callable(walker: &PythonWalker, node: Node) -> Option<Callable> {
    let name = walker.base.field_text(&node, "name")?;
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| extract_parameters(walker, p))
        .unwrap_or_default();
    let return_type = walker
        .base
        .field_text(&node, "return_type")
        .unwrap_or_default();
    let is_generator = node
        .child_by_field_name("body")
        .is_some_and(|body| contains_kind(&body, "yield", NESTED_SCOPES));

    Some(Callable {
        name,
        parameters,
        return_type,
        is_async: has_child_of_kind(&node, "async"),
        is_generator,
    })
}

/// Module-level `def`
pub(crate) fn extract_function(walker: &mut PythonWalker, node: Node) {
    let Some(callable) = read_callable(walker, node) else {
        return;
    };
    let position = walker.base.position(&node);
    let is_public = python_is_public(&callable.name);
    if is_public {
        walker.add_export_candidate(&callable.name, ExportKind::Function, position);
    }

    walker.model.functions.push(Function {
        name: callable.name,
        parameters: callable.parameters,
        return_type: callable.return_type,
        is_public,
        is_async: callable.is_async,
        is_generator: callable.is_generator,
        position,
        description: String::new(),
    });
}

/// `def` inside a class body
///
/// `self`/`cls` is dropped from the parameters unless the method is a
/// `@staticmethod`, whose first parameter is an ordinary argument.
pub(crate) fn extract_method(
    walker: &PythonWalker,
    node: Node,
    owner: &str,
    owner_is_interface: bool,
    decorators: &[String],
) -> Option<Method> {
    let mut callable = read_callable(walker, node)?;

    let is_staticmethod = has_decorator(decorators, "staticmethod");
    let is_classmethod = has_decorator(decorators, "classmethod");
    if !is_staticmethod
        && callable
            .parameters
            .first()
            .is_some_and(|p| p.name == "self" || p.name == "cls")
    {
        callable.parameters.remove(0);
    }

    let kind = if has_decorator(decorators, "property") {
        MethodKind::Getter
    } else if setter_target(decorators).is_some() {
        MethodKind::Setter
    } else {
        MethodKind::Method
    };

    Some(Method {
        is_public: python_is_public(&callable.name),
        is_constructor: callable.name == "__init__",
        name: callable.name,
        belongs_to: owner.to_string(),
        parameters: callable.parameters,
        return_type: callable.return_type,
        is_async: callable.is_async,
        is_generator: callable.is_generator,
        is_static: is_staticmethod || is_classmethod,
        is_abstract: owner_is_interface || has_decorator(decorators, "abstractmethod"),
        kind,
        position: walker.base.position(&node),
        description: String::new(),
    })
}

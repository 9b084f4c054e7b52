use super::PythonWalker;
use crate::extractors::base::Parameter;
use tree_sitter::Node;

/// Parameters of a `parameters` node, in declaration order
///
/// Splat parameters keep their stars in the name (`*args`, `**kwargs`);
/// the bare `*` and `/` separators are not parameters.
pub(crate) fn extract_parameters(walker: &PythonWalker, parameters: Node) -> Vec<Parameter> {
    let mut result = Vec::new();
    let mut cursor = parameters.walk();

    for child in parameters.named_children(&mut cursor) {
        let text = |n: &Node| walker.base.get_node_text(n);
        let parameter = match child.kind() {
            "identifier" => Parameter::named(text(&child)),
            "typed_parameter" => {
                let type_name = walker.base.field_text(&child, "type").unwrap_or_default();
                match child.named_child(0) {
                    Some(inner)
                        if matches!(
                            inner.kind(),
                            "list_splat_pattern" | "dictionary_splat_pattern"
                        ) =>
                    {
                        Parameter::named(text(&inner)).with_type(type_name).variadic()
                    }
                    Some(inner) => Parameter::named(text(&inner)).with_type(type_name),
                    None => continue,
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(name_node) = child.child_by_field_name("name") else {
                    continue;
                };
                let mut parameter = Parameter::named(text(&name_node))
                    .with_default(walker.base.field_text(&child, "value").unwrap_or_default());
                if let Some(type_name) = walker.base.field_text(&child, "type") {
                    parameter = parameter.with_type(type_name);
                }
                parameter.is_destructured_array =
                    matches!(name_node.kind(), "tuple_pattern" | "list_pattern");
                parameter
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                Parameter::named(text(&child)).variadic()
            }
            "tuple_pattern" | "list_pattern" => {
                let mut parameter = Parameter::named(text(&child));
                parameter.is_destructured_array = true;
                parameter
            }
            // keyword_separator, positional_separator, comment
            _ => continue,
        };
        result.push(parameter);
    }

    result
}

use crate::extractors::base::tree_methods::has_child_of_kind;
use crate::extractors::base::{Function, Method, MethodKind};
use tree_sitter::Node;

/// Node kinds that produce a callable value
pub(super) const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

/// Function and method extraction for JavaScript/TypeScript
impl super::JsWalker<'_> {
    /// `function name() {}`, `function* name() {}` and TypeScript
    /// `function name(): T;` signatures
    ///
    /// Adjacent declarations of one name (overload signatures followed by
    /// the implementation) are recorded once, at the first signature.
    pub(super) fn extract_function_declaration(&mut self, node: Node) {
        let Some(name) = self.base.field_text(&node, "name") else {
            return;
        };
        if self.model.functions.last().is_some_and(|f| f.name == name) {
            return;
        }
        let function = self.build_function(node, name, node);
        self.model.functions.push(function);
    }

    /// `const name = (...) => {}` / `const name = function () {}`
    pub(super) fn extract_function_value(&mut self, name: String, value: Node, declarator: Node) {
        let function = self.build_function(value, name, declarator);
        self.model.functions.push(function);
    }

    /// Callable fields for any function-like node; `position_node` is the
    /// node whose span is recorded
    fn build_function(&self, node: Node, name: String, position_node: Node) -> Function {
        let parameters = if node.kind() == "arrow_function" {
            self.arrow_parameters(node)
        } else {
            node.child_by_field_name("parameters")
                .map(|p| self.extract_parameters(p))
                .unwrap_or_default()
        };

        Function {
            name,
            parameters,
            return_type: self.return_type(node),
            // Module-scope names cannot carry the `#` private marker
            is_public: true,
            is_async: has_child_of_kind(&node, "async"),
            is_generator: node.kind().starts_with("generator_function")
                || has_child_of_kind(&node, "*"),
            position: self.base.position(&position_node),
            description: String::new(),
        }
    }

    /// `method_definition` (and TypeScript signatures) inside a class body
    pub(super) fn extract_method_definition(&self, node: Node, owner: &str) -> Option<Method> {
        let name_node = node.child_by_field_name("name")?;
        let raw_name = self.base.get_node_text(&name_node);
        let (name, is_public) = self.member_visibility(node, &raw_name);

        let kind = if self.has_modifier(node, "get") {
            MethodKind::Getter
        } else if self.has_modifier(node, "set") {
            MethodKind::Setter
        } else {
            MethodKind::Method
        };

        Some(Method {
            is_constructor: name == "constructor",
            name,
            belongs_to: owner.to_string(),
            parameters: node
                .child_by_field_name("parameters")
                .map(|p| self.extract_parameters(p))
                .unwrap_or_default(),
            return_type: self.return_type(node),
            is_public,
            is_async: self.has_modifier(node, "async"),
            is_generator: self.has_modifier(node, "*"),
            is_static: self.has_modifier(node, "static"),
            is_abstract: matches!(node.kind(), "abstract_method_signature" | "method_signature"),
            kind,
            position: self.base.position(&node),
            description: String::new(),
        })
    }
}

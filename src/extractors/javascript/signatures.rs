use crate::extractors::base::Parameter;
use tree_sitter::Node;

/// Parameter and type-annotation extraction shared by JavaScript and TypeScript
impl super::JsWalker<'_> {
    /// Parameters of a `formal_parameters` node
    ///
    /// Destructuring patterns are flagged but not decomposed; the stored
    /// name is the pattern's source text.
    pub(super) fn extract_parameters(&self, node: Node) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            let parameter = match child.kind() {
                // TypeScript wraps every parameter
                "required_parameter" | "optional_parameter" => {
                    let Some(pattern) = child.child_by_field_name("pattern") else {
                        continue;
                    };
                    if pattern.kind() == "this" {
                        continue;
                    }
                    let mut parameter = self.pattern_parameter(pattern);
                    if let Some(annotation) = child.child_by_field_name("type") {
                        parameter.type_name = self.annotation_text(annotation);
                    }
                    if let Some(value) = child.child_by_field_name("value") {
                        parameter.default_value = self.base.get_node_text(&value);
                        parameter.is_required = false;
                    }
                    if child.kind() == "optional_parameter" {
                        parameter.is_required = false;
                    }
                    parameter
                }
                "identifier" | "assignment_pattern" | "rest_pattern" | "object_pattern"
                | "array_pattern" => self.pattern_parameter(child),
                _ => continue,
            };
            parameters.push(parameter);
        }

        parameters
    }

    /// Single `identifier` parameter of a paren-less arrow function
    pub(super) fn arrow_parameters(&self, arrow: Node) -> Vec<Parameter> {
        if let Some(list) = arrow.child_by_field_name("parameters") {
            return self.extract_parameters(list);
        }
        arrow
            .child_by_field_name("parameter")
            .map(|p| vec![Parameter::named(self.base.get_node_text(&p))])
            .unwrap_or_default()
    }

    fn pattern_parameter(&self, pattern: Node) -> Parameter {
        match pattern.kind() {
            "assignment_pattern" => {
                let left = pattern.child_by_field_name("left");
                let mut parameter = left
                    .map(|l| self.pattern_parameter(l))
                    .unwrap_or_default();
                parameter.default_value = self.base.field_text(&pattern, "right").unwrap_or_default();
                parameter.is_required = false;
                parameter
            }
            "rest_pattern" => {
                let inner = pattern.named_child(0);
                let mut parameter = inner
                    .map(|i| self.pattern_parameter(i))
                    .unwrap_or_else(|| {
                        let text = self.base.get_node_text(&pattern);
                        Parameter::named(text.trim_start_matches("...").to_string())
                    });
                parameter.is_variadic = true;
                parameter.is_required = false;
                parameter
            }
            "object_pattern" => Parameter {
                is_destructured_object: true,
                ..Parameter::named(self.base.get_node_text(&pattern))
            },
            "array_pattern" => Parameter {
                is_destructured_array: true,
                ..Parameter::named(self.base.get_node_text(&pattern))
            },
            _ => Parameter::named(self.base.get_node_text(&pattern)),
        }
    }

    /// `: string` → `string`
    pub(super) fn annotation_text(&self, annotation: Node) -> String {
        let text = self.base.get_node_text(&annotation);
        text.trim()
            .trim_start_matches('?')
            .trim_start_matches(':')
            .trim()
            .to_string()
    }

    pub(super) fn return_type(&self, node: Node) -> String {
        node.child_by_field_name("return_type")
            .map(|r| self.annotation_text(r))
            .unwrap_or_default()
    }

    /// Names declared by a `type_parameters` node (`<T, U extends X>` → T, U)
    pub(super) fn type_parameter_names(&self, node: Node) -> Vec<String> {
        let Some(parameters) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut cursor = parameters.walk();
        let names: Vec<String> = parameters
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| self.base.field_text(&p, "name"))
            .collect();
        names
    }

    /// Binding names introduced by a declarator pattern
    pub(super) fn pattern_names(&self, pattern: Node) -> Vec<String> {
        match pattern.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                vec![self.base.get_node_text(&pattern)]
            }
            "object_pattern" | "array_pattern" => {
                let mut names = Vec::new();
                let mut cursor = pattern.walk();
                for child in pattern.named_children(&mut cursor) {
                    match child.kind() {
                        "pair_pattern" => {
                            if let Some(value) = child.child_by_field_name("value") {
                                names.extend(self.pattern_names(value));
                            }
                        }
                        "object_assignment_pattern" | "assignment_pattern" => {
                            if let Some(left) = child.child_by_field_name("left") {
                                names.extend(self.pattern_names(left));
                            }
                        }
                        "rest_pattern" => {
                            if let Some(inner) = child.named_child(0) {
                                names.extend(self.pattern_names(inner));
                            }
                        }
                        _ => names.extend(self.pattern_names(child)),
                    }
                }
                names
            }
            _ => Vec::new(),
        }
    }
}

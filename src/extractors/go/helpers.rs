use crate::extractors::base::Parameter;
use tree_sitter::Node;

/// Parameter, result and receiver helpers for Go
impl super::GoWalker<'_> {
    /// Parameters of a `parameter_list`, in declaration order
    ///
    /// `a, b int` yields two parameters sharing the type; unnamed
    /// parameters (`func(int)`) keep an empty name.
    pub(super) fn extract_parameter_list(&self, node: Node) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "parameter_declaration" => {
                    let type_name = self.base.field_text(&child, "type").unwrap_or_default();
                    let mut name_cursor = child.walk();
                    let names: Vec<String> = child
                        .children_by_field_name("name", &mut name_cursor)
                        .map(|n| self.base.get_node_text(&n))
                        .collect();

                    if names.is_empty() {
                        parameters.push(Parameter::named("").with_type(type_name));
                    } else {
                        for name in names {
                            parameters.push(Parameter::named(name).with_type(type_name.clone()));
                        }
                    }
                }
                "variadic_parameter_declaration" => {
                    let name = self.base.field_text(&child, "name").unwrap_or_default();
                    let type_name = self.base.field_text(&child, "type").unwrap_or_default();
                    parameters.push(
                        Parameter::named(name)
                            .with_type(format!("...{}", type_name))
                            .variadic(),
                    );
                }
                _ => {}
            }
        }

        parameters
    }

    /// Render a `result` node: `(int, error)` becomes "int, error"
    pub(super) fn render_result(&self, node: Node) -> String {
        if node.kind() != "parameter_list" {
            return self.base.get_node_text(&node);
        }

        self.extract_parameter_list(node)
            .into_iter()
            .map(|p| {
                if p.name.is_empty() {
                    p.type_name
                } else {
                    format!("{} {}", p.name, p.type_name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Owning type named by a method receiver, sigils and type arguments removed
    pub(super) fn receiver_type(&self, receiver: Node) -> Option<String> {
        let mut cursor = receiver.walk();
        let declaration = receiver
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_declaration")?;
        let type_text = self.base.field_text(&declaration, "type")?;
        let owner = strip_type_decorations(&type_text);
        (!owner.is_empty()).then_some(owner)
    }

    /// Names declared by a `type_parameter_list`
    pub(super) fn type_parameter_names(&self, node: Node) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for declaration in node.named_children(&mut cursor) {
            if declaration.kind() != "type_parameter_declaration" {
                continue;
            }
            let mut name_cursor = declaration.walk();
            names.extend(
                declaration
                    .children_by_field_name("name", &mut name_cursor)
                    .map(|n| self.base.get_node_text(&n)),
            );
        }
        names
    }
}

/// `*List[T]` → `List`, `&pkg.Node` → `pkg.Node`
pub(super) fn strip_type_decorations(type_text: &str) -> String {
    let trimmed = type_text
        .trim()
        .trim_start_matches(|c: char| c == '*' || c == '&' || c == '(')
        .trim_end_matches(')');
    let without_generics = trimmed.split('[').next().unwrap_or(trimmed);
    without_generics.trim().to_string()
}

use crate::extractors::base::visibility::go_is_public;
use crate::extractors::base::{Constant, ExportKind, Position, Variable};
use tree_sitter::Node;

/// `const`/`var` spec contents: names paired with values by index
struct SpecEntries {
    names: Vec<String>,
    type_name: String,
    values: Vec<String>,
    position: Position,
}

/// Constant and variable extraction for Go
impl super::GoWalker<'_> {
    pub(super) fn extract_constants(&mut self, node: Node) {
        let mut cursor = node.walk();
        for spec in node.named_children(&mut cursor) {
            if spec.kind() != "const_spec" {
                continue;
            }
            let entries = self.read_spec(spec);
            for (index, name) in entries.names.iter().enumerate() {
                let constant = Constant {
                    name: name.clone(),
                    type_name: entries.type_name.clone(),
                    value: entries.values.get(index).cloned().unwrap_or_default(),
                    is_public: go_is_public(name),
                    position: entries.position,
                };
                if constant.is_public {
                    self.add_export(name, ExportKind::Constant, entries.position);
                }
                self.model.constants.push(constant);
            }
        }
    }

    pub(super) fn extract_variables(&mut self, node: Node) {
        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "var_spec" => specs.push(child),
                "var_spec_list" => {
                    let mut list_cursor = child.walk();
                    specs.extend(
                        child
                            .named_children(&mut list_cursor)
                            .filter(|c| c.kind() == "var_spec"),
                    );
                }
                _ => {}
            }
        }

        for spec in specs {
            let entries = self.read_spec(spec);
            for name in &entries.names {
                let is_public = go_is_public(name);
                if is_public {
                    self.add_export(name, ExportKind::Variable, entries.position);
                }
                self.model.variables.push(Variable {
                    name: name.clone(),
                    type_name: entries.type_name.clone(),
                    is_public,
                    position: entries.position,
                });
            }
        }
    }

    fn read_spec(&self, spec: Node) -> SpecEntries {
        let mut name_cursor = spec.walk();
        let names = spec
            .children_by_field_name("name", &mut name_cursor)
            .map(|n| self.base.get_node_text(&n))
            .filter(|n| n != "_")
            .collect();

        let values = spec
            .child_by_field_name("value")
            .map(|list| {
                let mut cursor = list.walk();
                let values: Vec<String> = list
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() != "comment")
                    .map(|c| self.base.get_node_text(&c))
                    .collect();
                values
            })
            .unwrap_or_default();

        SpecEntries {
            names,
            type_name: self.base.field_text(&spec, "type").unwrap_or_default(),
            values,
            position: self.base.position(&spec),
        }
    }
}

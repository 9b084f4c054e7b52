use crate::extractors::base::{unquote, Import};
use tree_sitter::Node;

/// Import extraction for Go
impl super::GoWalker<'_> {
    /// `import "x"` or a grouped `import ( ... )` block
    pub(super) fn extract_imports(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => self.extract_import_spec(child),
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.named_children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            self.extract_import_spec(spec);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_import_spec(&mut self, spec: Node) {
        let Some(path) = self.base.field_text(&spec, "path").map(|p| unquote(&p)) else {
            return;
        };
        let alias = self.base.field_text(&spec, "name").unwrap_or_default();

        // Binding the import introduces: the alias, else the last path segment.
        // Dot and blank imports introduce no named binding.
        let names = match alias.as_str() {
            "." | "_" => Vec::new(),
            "" => vec![path.rsplit('/').next().unwrap_or(&path).to_string()],
            other => vec![other.to_string()],
        };

        self.model.imports.push(Import {
            is_namespace: alias == ".",
            path,
            alias,
            names,
            position: self.base.position(&spec),
            ..Default::default()
        });
    }
}

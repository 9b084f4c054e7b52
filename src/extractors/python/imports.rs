use super::PythonWalker;
use crate::extractors::base::tree_methods::has_child_of_kind;
use crate::extractors::base::Import;
use tree_sitter::Node;

/// One Import per bound name
///
/// - `import a.b as c, d` → `a.b` (alias `c`), `d`
/// - `from m import x as y, z` → `m` binding `y`, `m` binding `z`
/// - `from m import *` → one namespace import of `m`
pub(crate) fn extract_imports(walker: &mut PythonWalker, node: Node) {
    let position = walker.base.position(&node);

    let module = match node.kind() {
        "import_statement" => None,
        "future_import_statement" => Some("__future__".to_string()),
        _ => walker.base.field_text(&node, "module_name"),
    };

    let mut imports = Vec::new();
    let mut cursor = node.walk();
    for name_node in node.children_by_field_name("name", &mut cursor) {
        let (target, alias) = match name_node.kind() {
            "aliased_import" => (
                walker.base.field_text(&name_node, "name").unwrap_or_default(),
                walker.base.field_text(&name_node, "alias").unwrap_or_default(),
            ),
            _ => (walker.base.get_node_text(&name_node), String::new()),
        };

        let import = match &module {
            // `import os.path` binds `os`
            None => Import {
                names: vec![if alias.is_empty() {
                    target.split('.').next().unwrap_or(&target).to_string()
                } else {
                    alias.clone()
                }],
                path: target,
                alias,
                position,
                ..Default::default()
            },
            Some(module) => Import {
                path: module.clone(),
                names: vec![if alias.is_empty() { target } else { alias.clone() }],
                alias,
                position,
                ..Default::default()
            },
        };
        imports.push(import);
    }

    if let Some(module) = module {
        if has_child_of_kind(&node, "wildcard_import") {
            imports.push(Import {
                path: module,
                is_namespace: true,
                position,
                ..Default::default()
            });
        }
    }

    walker.model.imports.extend(imports);
}

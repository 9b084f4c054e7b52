// Tree navigation helpers shared by the language walkers

use tree_sitter::Node;

/// First direct child of the given kind
pub fn child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// All direct children of the given kind, in source order
pub fn children_of_kind<'t>(node: &Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

/// Whether any direct child (named or anonymous) has the given kind
pub fn has_child_of_kind(node: &Node, kind: &str) -> bool {
    child_of_kind(node, kind).is_some()
}

/// Search descendants for `kind`, not descending into nodes whose kind is in `stop_at`
pub fn contains_kind(node: &Node, kind: &str, stop_at: &[&str]) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            return true;
        }
        if stop_at.contains(&child.kind()) {
            continue;
        }
        if contains_kind(&child, kind, stop_at) {
            return true;
        }
    }
    false
}

use crate::extractors::base::tree_methods::child_of_kind;
use crate::extractors::base::visibility::js_member_visibility;
use tree_sitter::Node;

/// Visibility of class members
impl super::JsWalker<'_> {
    /// Stored name and public flag for a member
    ///
    /// `#name` members are private with the `#` removed. TypeScript
    /// `private`/`protected` modifiers also make a member non-public.
    pub(super) fn member_visibility(&self, member: Node, raw_name: &str) -> (String, bool) {
        let (name, mut is_public) = js_member_visibility(raw_name);
        if let Some(modifier) = child_of_kind(&member, "accessibility_modifier") {
            let text = self.base.get_node_text(&modifier);
            if text == "private" || text == "protected" {
                is_public = false;
            }
        }
        (name, is_public)
    }

    /// Whether an anonymous keyword token (`static`, `async`, `get`, ...)
    /// appears among the member's children before its name
    pub(super) fn has_modifier(&self, member: Node, keyword: &str) -> bool {
        let name_start = member
            .child_by_field_name("name")
            .map(|n| n.start_byte())
            .unwrap_or(usize::MAX);
        let mut cursor = member.walk();
        let found = member
            .children(&mut cursor)
            .take_while(|c| c.start_byte() < name_start)
            .any(|c| !c.is_named() && c.kind() == keyword);
        found
    }
}

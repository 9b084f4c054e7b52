// Visibility predicates
//
// Pure functions so every walker applies exactly one rule per language.

/// Go: exported iff the first character is uppercase
pub fn go_is_public(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Python: public unless `_`-prefixed, but `__init__` is always public
pub fn python_is_public(name: &str) -> bool {
    !name.starts_with('_') || name == "__init__"
}

/// JavaScript/TypeScript: `#name` is private. Returns the stored name
/// (without `#`) and whether it is public.
pub fn js_member_visibility(raw_name: &str) -> (String, bool) {
    match raw_name.strip_prefix('#') {
        Some(stripped) => (stripped.to_string(), false),
        None => (raw_name.to_string(), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_visibility_follows_case() {
        assert!(go_is_public("Handler"));
        assert!(go_is_public("Ärger"));
        assert!(!go_is_public("handler"));
        assert!(!go_is_public("_x"));
        assert!(!go_is_public(""));
    }

    #[test]
    fn python_visibility_allows_init() {
        assert!(python_is_public("run"));
        assert!(python_is_public("__init__"));
        assert!(!python_is_public("_helper"));
        assert!(!python_is_public("__repr__"));
    }

    #[test]
    fn js_private_names_are_stripped() {
        assert_eq!(js_member_visibility("#count"), ("count".to_string(), false));
        assert_eq!(js_member_visibility("count"), ("count".to_string(), true));
    }
}

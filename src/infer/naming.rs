//! Deterministic identifier derivation for generated code: sanitize source
//! keys, camelCase fields, PascalCase classes, singularize list keys.

/// Replace everything outside `[A-Za-z0-9_]` with `_` and guard a leading
/// digit. May return an empty string; callers supply the fallback.
pub fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    out = out.trim_matches('_').to_string();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// camelCase field name; `field` when sanitization yields nothing.
pub fn field_name(source_key: &str) -> String {
    let joined = case_join(source_key, false);
    if joined.is_empty() { "field".to_string() } else { joined }
}

/// PascalCase class name; `Item` when sanitization yields nothing.
pub fn class_name(source_key: &str) -> String {
    let joined = case_join(source_key, true);
    if joined.is_empty() { "Item".to_string() } else { joined }
}

/// Class name for the element type of a list field, e.g. `users` → `User`.
pub fn element_class_name(list_key: &str) -> String {
    class_name(&singularize(list_key))
}

fn case_join(raw: &str, pascal: bool) -> String {
    let sanitized = sanitize(raw);
    let mut out = String::with_capacity(sanitized.len());
    let mut first_word = true;
    for word in sanitized.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        let head = chars.next().unwrap();
        if first_word && !pascal {
            out.push(head.to_ascii_lowercase());
        } else {
            out.push(head.to_ascii_uppercase());
        }
        out.extend(chars);
        first_word = false;
    }
    // keep the digit guard from sanitize
    if sanitized.starts_with('_') && !out.is_empty() {
        out.insert(0, '_');
    }
    out
}

/// Naive English singularization, good enough for key-derived type names.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if lower.ends_with("ses") && word.len() > 3 {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_and_guards_digits() {
        assert_eq!(sanitize("first name"), "first_name");
        assert_eq!(sanitize("1st_place"), "_1st_place");
        assert_eq!(sanitize("@#!"), "");
    }

    #[test]
    fn field_and_class_casing() {
        assert_eq!(field_name("user name"), "userName");
        assert_eq!(field_name("UserName"), "userName");
        assert_eq!(class_name("order_items"), "OrderItems");
        assert_eq!(field_name("!!!"), "field");
        assert_eq!(class_name(""), "Item");
    }

    #[test]
    fn singularize_common_plurals() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("entries"), "entry");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("data"), "data");
        assert_eq!(singularize("class"), "class");
    }

    #[test]
    fn element_class_names() {
        assert_eq!(element_class_name("users"), "User");
        assert_eq!(element_class_name("order_items"), "OrderItem");
    }
}

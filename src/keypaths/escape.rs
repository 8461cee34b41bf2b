use std::borrow::Cow;

/// Path token for a field name.
///
/// Names containing `.`, `[` or `]` become `["name"]`, with the name embedded
/// verbatim. The empty name gets the same treatment so that no path is ever the
/// empty string.
pub fn escape_key(name: &str) -> Cow<'_, str> {
    if name.is_empty() || name.contains(['.', '[', ']']) {
        Cow::Owned(format!("[\"{name}\"]"))
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert!(matches!(escape_key("birthDate"), Cow::Borrowed("birthDate")));
        assert_eq!(escape_key("_source"), "_source");
        assert_eq!(escape_key("with space"), "with space");
    }

    #[test]
    fn special_characters_get_quoted() {
        assert_eq!(escape_key("a.b"), r#"["a.b"]"#);
        assert_eq!(escape_key("x[0]"), r#"["x[0]"]"#);
        assert_eq!(escape_key("]"), r#"["]"]"#);
        assert_eq!(escape_key(""), r#"[""]"#);
    }
}

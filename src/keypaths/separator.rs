use crate::shape::ShapeKind;

/// What goes between a field/index token and the sub-path of the child it leads to.
///
/// Array children start their sub-paths with a bracket index, which reads
/// correctly glued straight on (`rgb[0]`). Object children need a dot.
pub fn separator(child: ShapeKind, suffix: &str) -> &'static str {
    if suffix.is_empty() {
        return "";
    }
    match child {
        ShapeKind::Array => "",
        ShapeKind::Object | ShapeKind::Leaf => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_suffix_needs_nothing() {
        assert_eq!(separator(ShapeKind::Object, ""), "");
        assert_eq!(separator(ShapeKind::Array, ""), "");
    }

    #[test]
    fn arrays_glue_objects_dot() {
        assert_eq!(separator(ShapeKind::Array, "[0]"), "");
        assert_eq!(separator(ShapeKind::Object, "hits"), ".");
        assert_eq!(separator(ShapeKind::Object, r#"["a.b"]"#), ".");
    }
}

use crate::inference::Evidence;
use crate::shape::{Field, Key, Shape};

/// Lower accumulated evidence to a shape.
///
/// Arrays come first, then objects; a position seen as both becomes a union.
/// Scalars and nulls add nothing beyond a leaf.
pub fn lower_to_shape(ev: &Evidence) -> Shape {
    let mut arms: Vec<Shape> = Vec::new();

    // 1) Arrays: tuple only with proof, otherwise a list
    if let Some(arr) = &ev.arr {
        if arr.is_tuple() {
            let elems = arr.cols.iter().map(lower_to_shape).collect::<Vec<_>>();
            let min_items = arr.min_items();
            arms.push(Shape::Tuple { elems, min_items });
        } else if arr.item.is_bottom() {
            // only ever empty: nothing to index
            arms.push(Shape::tuple(Vec::new()));
        } else {
            arms.push(Shape::list(lower_to_shape(&arr.item)));
        }
    }

    // 2) Objects
    if let Some(obj) = &ev.obj {
        let fields = obj
            .fields
            .iter()
            .map(|(name, f)| Field { key: Key::Str(name.clone()), shape: lower_to_shape(f) })
            .collect();
        arms.push(Shape::Object { fields });
    }

    Shape::union(arms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::infer_from_values;
    use serde_json::json;

    #[test]
    fn scalars_and_nulls_are_leaves() {
        for v in [json!(null), json!(1), json!("s"), json!(true)] {
            assert_eq!(lower_to_shape(&infer_from_values([&v])), Shape::Leaf);
        }
    }

    #[test]
    fn empty_arrays_become_zero_arity_tuples() {
        let v = json!({"tags": []});
        let shape = lower_to_shape(&infer_from_values([&v]));
        assert_eq!(shape, Shape::object([("tags", Shape::tuple(vec![]))]));
    }

    #[test]
    fn padded_tuple_keeps_optional_tail() {
        let a = json!([1, null, "x"]);
        let b = json!([2, null]);
        let shape = lower_to_shape(&infer_from_values([&a, &b]));
        assert_eq!(shape, Shape::tuple_with_optional(vec![Shape::Leaf; 3], 2));
    }

    #[test]
    fn array_or_object_becomes_union() {
        let a = json!({"v": [1, 2]});
        let b = json!({"v": {"w": 1}});
        let shape = lower_to_shape(&infer_from_values([&a, &b]));
        assert_eq!(shape, Shape::object([(
            "v",
            Shape::union([Shape::list(Shape::Leaf), Shape::object([("w", Shape::Leaf)])]),
        )]));
    }
}

use std::fmt;
use crate::shape::Shape;

/// One way of indexing into an array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Designator {
    /// A concrete position of a fixed-arity tuple.
    Literal(usize),
    /// Any non-negative integer; used for open-ended lists.
    Wildcard,
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Designator::Literal(i) => write!(f, "[{i}]"),
            Designator::Wildcard => f.write_str("[*]"),
        }
    }
}

/// Designators of an array shape, paired with the shape found there.
///
/// Tuples yield one literal per declared position, optional ones included.
/// Lists yield a single wildcard. Anything else yields nothing.
pub fn designators(shape: &Shape) -> Vec<(Designator, &Shape)> {
    match shape {
        Shape::Tuple { elems, .. } => elems
            .iter()
            .enumerate()
            .map(|(i, elem)| (Designator::Literal(i), elem))
            .collect(),
        Shape::List { item } => vec![(Designator::Wildcard, item.as_ref())],
        _ => Vec::new(),
    }
}

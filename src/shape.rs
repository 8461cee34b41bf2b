//! Structural description of a value: what can be addressed below it.
//!
//! A `Shape` says nothing about scalar types. Strings, numbers, booleans and
//! null all collapse to `Leaf`; only containers carry structure.
pub mod schema;

use std::borrow::Cow;
use indexmap::IndexMap;

pub use schema::Schema;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Shape {
    /// Nothing addressable below this point.
    #[default]
    Leaf,
    /// Field name → child shape. Declaration order is kept for output stability.
    Object { fields: Vec<Field> },
    /// Fixed-arity array. Positions at or past `min_items` are optional.
    Tuple { elems: Vec<Shape>, min_items: usize },
    /// Open-ended array; every element has the `item` shape.
    List { item: Box<Shape> },
    /// Any one of the arms.
    Union(Vec<Shape>),
    /// By-name reference into `Definitions`.
    Ref(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: Key,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Num(i64),
    /// Symbolic keys never take part in path enumeration.
    Symbol(String),
}

/// The coarse kind of a resolved shape, as seen by separator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Leaf,
    Object,
    Array,
}

/// Named shapes reachable through `Shape::Ref`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    named: IndexMap<String, Shape>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Shape {
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, Shape)>,
    {
        Shape::Object {
            fields: fields.into_iter().map(|(key, shape)| Field { key: key.into(), shape }).collect(),
        }
    }

    /// A tuple where every position is required.
    pub fn tuple(elems: Vec<Shape>) -> Self {
        let min_items = elems.len();
        Shape::Tuple { elems, min_items }
    }

    /// A tuple whose trailing positions from `min_items` on may be absent.
    pub fn tuple_with_optional(elems: Vec<Shape>, min_items: usize) -> Self {
        let min_items = min_items.min(elems.len());
        Shape::Tuple { elems, min_items }
    }

    pub fn list(item: Shape) -> Self {
        Shape::List { item: Box::new(item) }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Shape::Ref(name.into())
    }

    /// Kind of this node without looking through `Ref`/`Union`.
    /// Callers that need the resolved kind go through `Definitions::arms` first.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Object { .. } => ShapeKind::Object,
            Shape::Tuple { .. } | Shape::List { .. } => ShapeKind::Array,
            Shape::Leaf | Shape::Union(_) | Shape::Ref(_) => ShapeKind::Leaf,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Shape::Leaf)
    }

    /// Build a union, flattening nested unions and collapsing trivial cases.
    pub fn union(arms: impl IntoIterator<Item = Shape>) -> Self {
        let mut flat = Vec::<Shape>::new();
        let mut push = |arm: Shape| {
            if !flat.contains(&arm) {
                flat.push(arm);
            }
        };
        for arm in arms {
            match arm {
                Shape::Union(inner) => inner.into_iter().for_each(&mut push),
                other => push(other),
            }
        }
        if flat.len() > 1 && flat.iter().any(|s| !s.is_leaf()) {
            // leaf arms add no paths once a structured arm exists
            flat.retain(|s| !s.is_leaf());
        }
        match flat.len() {
            0 => Shape::Leaf,
            1 => flat.remove(0),
            _ => Shape::Union(flat),
        }
    }
}

impl Key {
    /// The raw path name of this key, or `None` for keys that are not addressable.
    pub fn path_name(&self) -> Option<Cow<'_, str>> {
        match self {
            Key::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Key::Num(n) => Some(Cow::Owned(n.to_string())),
            Key::Symbol(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self { Key::Str(s.to_owned()) }
}

impl From<String> for Key {
    fn from(s: String) -> Self { Key::Str(s) }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self { Key::Num(n) }
}

impl Definitions {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, shape: Shape) -> Option<Shape> {
        self.named.insert(name.into(), shape)
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.named.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    pub fn len(&self) -> usize { self.named.len() }

    pub fn is_empty(&self) -> bool { self.named.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Shape)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Concrete arms of `shape`: refs resolved and unions flattened, so every
    /// returned shape is a `Leaf`, `Object`, `Tuple` or `List`.
    ///
    /// Unknown names and reference cycles that never pass through a structural
    /// node contribute no arms.
    pub fn arms<'a>(&'a self, shape: &'a Shape) -> Vec<&'a Shape> {
        let mut out = Vec::new();
        let mut visiting = Vec::<&str>::new();
        self.collect_arms(shape, &mut visiting, &mut out);
        out
    }

    fn collect_arms<'a>(&'a self, shape: &'a Shape, visiting: &mut Vec<&'a str>, out: &mut Vec<&'a Shape>) {
        match shape {
            Shape::Union(arms) => {
                for arm in arms {
                    self.collect_arms(arm, visiting, out);
                }
            }
            Shape::Ref(name) => {
                if visiting.contains(&name.as_str()) {
                    tracing::debug!(name = %name, "reference cycle without structure; skipping");
                    return;
                }
                match self.named.get_key_value(name.as_str()) {
                    Some((key, target)) => {
                        visiting.push(key.as_str());
                        self.collect_arms(target, visiting, out);
                        visiting.pop();
                    }
                    None => {
                        tracing::debug!(name = %name, "unresolved reference; treating as leaf");
                    }
                }
            }
            concrete => {
                if !out.iter().any(|seen| std::ptr::eq(*seen, concrete)) {
                    out.push(concrete);
                }
            }
        }
    }
}

impl FromIterator<(String, Shape)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (String, Shape)>>(iter: I) -> Self {
        Self { named: iter.into_iter().collect() }
    }
}

// ------------------------------- Tests ------------------------------------ //

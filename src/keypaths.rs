//! Key-path enumeration.
//!
//! For a shape, produce every path string that addresses a field or element
//! within it, e.g. `hits.hits[0]._source.name`. Descent is bounded by a
//! [`Depth`] counter so self-referential shapes terminate.
//!
//! Composition rule, for a field or index token `t` leading to child `c`:
//! - `t` itself is always emitted;
//! - for each sub-path `s` of `c`, emit `t + separator(kind(c), s) + s`.
pub mod depth;
pub mod escape;
pub mod index;
pub mod separator;
pub mod token;

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::PathSyntaxError;
use crate::shape::{Definitions, Shape};

pub use depth::{Depth, DepthCeiling, DEFAULT_DEPTH, MAX_DEPTH, UNBOUNDED_MAX_DEPTH};
pub use escape::escape_key;
pub use index::{designators, Designator};
pub use separator::separator;
pub use token::Token;

// ------------------------------- Options ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Nested levels to descend below the root's own fields.
    pub depth: u32,
    pub ceiling: DepthCeiling,
}

impl Default for Options {
    fn default() -> Self {
        Self { depth: DEFAULT_DEPTH, ceiling: DepthCeiling::Legacy }
    }
}

impl Options {
    pub fn with_depth(depth: u32) -> Self {
        Self { depth, ..Self::default() }
    }

    pub fn start(&self) -> Depth {
        let start = Depth::with_ceiling(self.depth, self.ceiling);
        if start.exceeds_ceiling() {
            tracing::warn!(
                depth = self.depth,
                max = MAX_DEPTH,
                "depth bound above the supported maximum; only top-level paths will be produced"
            );
        } else if self.ceiling == DepthCeiling::Unbounded && self.depth > UNBOUNDED_MAX_DEPTH {
            tracing::warn!(
                depth = self.depth,
                max = UNBOUNDED_MAX_DEPTH,
                "depth bound clamped to the unbounded maximum"
            );
        }
        start
    }
}

// ------------------------------- PathSet ---------------------------------- //

/// Deduplicated key paths, in production order.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathSet(IndexSet<String>);

impl PathSet {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn contains(&self, path: &str) -> bool { self.0.contains(path) }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn insert(&mut self, path: String) -> bool { self.0.insert(path) }

    /// Lexicographically sorted copy of the paths.
    pub fn sorted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.iter().collect();
        out.sort_unstable();
        out
    }

    /// Keep only the paths matching `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|p| keep(p));
    }

    /// Whether some member addresses the concrete path `path`, wildcard
    /// indices matching any literal index.
    pub fn admits(&self, path: &str) -> Result<bool, PathSyntaxError> {
        let concrete = token::parse(path)?;
        if self.contains(path) {
            return Ok(true);
        }
        for member in self.iter() {
            // members are produced by the enumerator and always parse
            let Ok(pattern) = token::parse(member) else { continue };
            if token::admits(&pattern, &concrete) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl FromIterator<String> for PathSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PathSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

impl IntoIterator for PathSet {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl Extend<String> for PathSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) { self.0.extend(iter) }
}

// ------------------------------ Enumerator -------------------------------- //

/// Walks shapes, resolving `Shape::Ref` through a set of definitions.
#[derive(Debug, Clone, Copy)]
pub struct Enumerator<'a> {
    defs: &'a Definitions,
}

static NO_DEFINITIONS: once_cell::sync::Lazy<Definitions> = once_cell::sync::Lazy::new(Definitions::default);

impl Default for Enumerator<'static> {
    fn default() -> Self {
        Self { defs: &NO_DEFINITIONS }
    }
}

impl<'a> Enumerator<'a> {
    pub fn new(defs: &'a Definitions) -> Self {
        Self { defs }
    }

    /// All paths below `shape` reachable within `depth`.
    ///
    /// An exhausted counter or a leaf yields the empty set. The caller that led
    /// here has already emitted the path of the node itself.
    pub fn enumerate(&self, shape: &Shape, depth: Depth) -> PathSet {
        let mut out = PathSet::new();
        if depth.is_exhausted() {
            return out;
        }
        for arm in self.defs.arms(shape) {
            match arm {
                Shape::Tuple { .. } | Shape::List { .. } => {
                    for (designator, child) in designators(arm) {
                        self.compose(&mut out, &designator.to_string(), child, depth);
                    }
                }
                Shape::Object { fields } => {
                    for field in fields {
                        let Some(name) = field.key.path_name() else { continue };
                        self.compose(&mut out, &escape_key(&name), &field.shape, depth);
                    }
                }
                Shape::Leaf | Shape::Union(_) | Shape::Ref(_) => {}
            }
        }
        out
    }

    fn compose(&self, out: &mut PathSet, token: &str, child: &Shape, depth: Depth) {
        out.insert(token.to_owned());
        let below = depth.descend();
        if below.is_exhausted() {
            return;
        }
        // each arm of a union child picks its own separator
        for arm in self.defs.arms(child) {
            let kind = arm.kind();
            for suffix in self.enumerate(arm, below) {
                out.insert(format!("{token}{}{suffix}", separator(kind, &suffix)));
            }
        }
    }
}

/// Key paths of a self-contained shape (no `Shape::Ref`s to resolve).
pub fn key_paths(shape: &Shape, options: Options) -> PathSet {
    Enumerator::default().enumerate(shape, options.start())
}

// ------------------------------- Tests ------------------------------------ //

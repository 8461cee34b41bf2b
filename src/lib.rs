//! Key-path enumeration for nested data shapes.
//!
//! Given a [`Shape`] (objects, fixed-arity tuples and open-ended lists nested to
//! any depth) produce every path string that addresses a field or element within
//! it, in the syntax deep-get utilities accept:
//!
//! ```
//! use json_keypaths::{key_paths, Options, Shape};
//!
//! let color = Shape::object([
//!     ("rgb", Shape::tuple(vec![Shape::Leaf; 3])),
//!     ("hex", Shape::Leaf),
//! ]);
//! let paths = key_paths(&color, Options::default());
//! assert_eq!(paths.sorted(), ["hex", "rgb", "rgb[0]", "rgb[1]", "rgb[2]"]);
//! ```
//!
//! Shapes can be written by hand, loaded from a JSON-Schema-ish document
//! ([`Schema`]) or inferred from JSON samples ([`inference::Inference`]).
pub mod cli;
pub mod error;
pub mod inference;
pub mod jq_exec;
pub mod keypaths;
pub mod lower;
pub mod shape;

pub use error::{PathSyntaxError, SchemaError};
pub use keypaths::{key_paths, Depth, DepthCeiling, Designator, Enumerator, Options, PathSet, Token};
pub use shape::{Definitions, Field, Key, Schema, Shape, ShapeKind};

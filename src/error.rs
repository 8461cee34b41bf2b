//! Library error types.
use thiserror::Error;

/// Failure to turn a JSON-Schema-ish document into a `Schema`.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document does not have the expected structure.
    #[error("at schema path {path}: {message}")]
    Malformed { path: String, message: String },
    /// A `$ref` that does not point into `#/$defs` or `#/definitions`.
    #[error("unsupported $ref `{0}` (only local `#/$defs/<name>` and `#/definitions/<name>` are understood)")]
    UnsupportedRef(String),
    /// A `$ref` naming a definition the document does not contain.
    #[error("$ref `{reference}` names unknown definition `{name}`")]
    UnknownDefinition { reference: String, name: String },
}

/// A path string that does not follow the key-path grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key path `{input}` at byte {offset}: {reason}")]
pub struct PathSyntaxError {
    pub input: String,
    pub offset: usize,
    pub reason: &'static str,
}

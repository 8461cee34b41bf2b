//! Parsing key-path strings back into tokens.
//!
//! Grammar:
//!
//! ```text
//! path   := head tail*
//! head   := ident | quoted | index
//! tail   := "." ident | "." quoted | index
//! ident  := one or more chars other than . [ ]
//! quoted := '["' chars '"]'        (ends at the first '"]')
//! index  := "[" digits "]" | "[*]"
//! ```
use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PathSyntaxError;
use super::escape::escape_key;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?s)(?P<dot>\.)?(?:\[(?P<index>[0-9]+)\]|(?P<wild>\[\*\])|\["(?P<quoted>.*?)"\]|(?P<ident>[^.\[\]]+))"#)
        .expect("static token regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Field(String),
    Index(usize),
    Wildcard,
}

impl Token {
    /// Whether this pattern token admits `concrete`. Wildcards admit any index.
    pub fn admits(&self, concrete: &Token) -> bool {
        match (self, concrete) {
            (Token::Wildcard, Token::Index(_) | Token::Wildcard) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Field(name) => f.write_str(&escape_key(name)),
            Token::Index(i) => write!(f, "[{i}]"),
            Token::Wildcard => f.write_str("[*]"),
        }
    }
}

pub fn parse(input: &str) -> Result<Vec<Token>, PathSyntaxError> {
    let error = |offset: usize, reason: &'static str| PathSyntaxError {
        input: input.to_owned(),
        offset,
        reason,
    };
    if input.is_empty() {
        return Err(error(0, "empty path"));
    }

    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset < input.len() {
        let rest = &input[offset..];
        let Some(caps) = TOKEN.captures(rest) else {
            return Err(error(offset, "expected a field, an index or a quoted key"));
        };
        let dotted = caps.name("dot").is_some();
        let token = if let Some(index) = caps.name("index") {
            if dotted {
                return Err(error(offset, "index must not follow a dot"));
            }
            let index = index
                .as_str()
                .parse::<usize>()
                .map_err(|_| error(offset, "index out of range"))?;
            Token::Index(index)
        } else if caps.name("wild").is_some() {
            if dotted {
                return Err(error(offset, "index must not follow a dot"));
            }
            Token::Wildcard
        } else {
            let name = caps
                .name("quoted")
                .or_else(|| caps.name("ident"))
                .map(|m| m.as_str())
                .unwrap_or_default();
            if tokens.is_empty() && dotted {
                return Err(error(offset, "path must not start with a dot"));
            }
            if !tokens.is_empty() && !dotted {
                return Err(error(offset, "field must be preceded by a dot"));
            }
            Token::Field(name.to_owned())
        };
        tokens.push(token);
        offset += caps.get(0).map_or(rest.len(), |m| m.end());
    }
    Ok(tokens)
}

/// Whether the token sequence `pattern` admits `concrete`.
pub fn admits(pattern: &[Token], concrete: &[Token]) -> bool {
    pattern.len() == concrete.len()
        && pattern.iter().zip(concrete).all(|(p, c)| p.admits(c))
}

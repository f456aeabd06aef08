//! Typed readers
//!
//! Readers on a node fail with `TypeMismatch` for incompatible variants.
//! The `get_child_*` forms resolve a path first and return `Ok(None)` when
//! it does not resolve.

use serde_json::Value;

use super::{Node, NodeKind};
use crate::error::{ConfigError, Result};

impl Node {
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Node::String(s) => Ok(s.as_str()),
            other => Err(mismatch(NodeKind::String, other)),
        }
    }

    /// Read an integer.
    ///
    /// Strings are parsed with base detection (see [`parse_int`]); numbers
    /// must be integral and fit in an `i64`.
    pub fn get_int(&self) -> Result<i64> {
        match self {
            Node::String(s) => parse_int(s),
            Node::Number(n) => n
                .as_i64()
                .ok_or_else(|| ConfigError::InvalidInteger(n.to_string())),
            other => Err(mismatch(NodeKind::Number, other)),
        }
    }

    /// Read a boolean. Strings are true only for `"true"` and `"True"`.
    pub fn get_bool(&self) -> Result<bool> {
        match self {
            Node::String(s) => Ok(s == "true" || s == "True"),
            Node::Bool(b) => Ok(*b),
            other => Err(mismatch(NodeKind::Bool, other)),
        }
    }

    pub fn get_dict(&self) -> Value {
        self.to_plain_value(true)
    }

    pub fn get_child_str(&self, path: &str) -> Result<Option<&str>> {
        self.get(path).map(Node::as_str).transpose()
    }

    pub fn get_child_int(&self, path: &str) -> Result<Option<i64>> {
        self.get(path).map(Node::get_int).transpose()
    }

    pub fn get_child_bool(&self, path: &str) -> Result<Option<bool>> {
        self.get(path).map(Node::get_bool).transpose()
    }

    pub fn get_child_dict(&self, path: &str) -> Option<Value> {
        self.get(path).map(Node::get_dict)
    }
}

fn mismatch(expected: NodeKind, found: &Node) -> ConfigError {
    ConfigError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

/// Parse an integer literal, detecting the base from its prefix.
///
/// `0x`/`0X` is hex, `0o`/`0O` and a bare leading `0` are octal, `0b`/`0B`
/// is binary, anything else decimal. An optional sign, surrounding
/// whitespace and single `_` separators between digits are accepted.
pub fn parse_int(text: &str) -> Result<i64> {
    let invalid = || ConfigError::InvalidInteger(text.to_string());

    let trimmed = text.trim();
    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let (radix, digits) = if let Some(rest) = strip_radix_prefix(unsigned, 'x') {
        (16, rest)
    } else if let Some(rest) = strip_radix_prefix(unsigned, 'o') {
        (8, rest)
    } else if let Some(rest) = strip_radix_prefix(unsigned, 'b') {
        (2, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // An explicit prefix may be followed by one separator ("0x_ff")
    let digits = if digits.len() + 2 == unsigned.len() {
        digits.strip_prefix('_').unwrap_or(digits)
    } else {
        digits
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.chars().all(|c| c == '_' || c.is_digit(radix))
    {
        return Err(invalid());
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let magnitude = u64::from_str_radix(&cleaned, radix).map_err(|_| invalid())?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(value).map_err(|_| invalid())
}

fn strip_radix_prefix(text: &str, marker: char) -> Option<&str> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('0'), Some(c)) if c.eq_ignore_ascii_case(&marker) => Some(chars.as_str()),
        _ => None,
    }
}

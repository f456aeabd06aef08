//! Error types for configuration trees.

use crate::tree::NodeKind;

/// Configuration tree errors.
///
/// Lookup misses are not errors: `get` and the `get_child_*` readers report
/// an unresolved path as `None`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A typed reader was called on a node of an incompatible variant.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: NodeKind, found: NodeKind },

    /// A string or number could not be read as a 64-bit integer.
    #[error("Invalid integer: {0}")]
    InvalidInteger(String),

    /// Input value has no matching node variant.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The top-level configuration must be a mapping.
    #[error("Root must be an object, found {0}")]
    RootNotObject(NodeKind),

    /// A write path tried to descend through a non-object node.
    #[error("Path conflict at '{segment}': cannot descend into {found}")]
    PathConflict { segment: String, found: NodeKind },

    /// A write path had no segments.
    #[error("Empty path")]
    EmptyPath,

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::TypeMismatch {
            expected: NodeKind::String,
            found: NodeKind::Array,
        };
        assert_eq!(err.to_string(), "Type mismatch: expected string, found array");

        let err = ConfigError::PathConflict {
            segment: "a".to_string(),
            found: NodeKind::Number,
        };
        assert!(err.to_string().contains("'a'"));
        assert!(err.to_string().contains("number"));
    }
}

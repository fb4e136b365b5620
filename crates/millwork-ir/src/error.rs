//! Error types for the schema document model.

use thiserror::Error;

/// Errors raised while interpreting a schema node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The node's `type` tag names no known component.
    #[error("unknown component type '{tag}' on node '{id}'")]
    UnknownComponentType {
        /// Offending node id.
        id: String,
        /// The unrecognized tag.
        tag: String,
    },

    /// The node's parameters are missing, mistyped or out of range.
    #[error("invalid parameters on node '{id}': {message}")]
    InvalidParameters {
        /// Offending node id.
        id: String,
        /// What was wrong.
        message: String,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

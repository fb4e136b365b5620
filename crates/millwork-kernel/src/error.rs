//! Error types for resolution.

use std::fmt;

use millwork_ir::SchemaError;
use millwork_math::{Face, GeometryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ancestor ids from the root down to a node, inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(pub Vec<String>);

impl NodePath {
    /// Path of `id` under this path.
    pub fn child(&self, id: &str) -> NodePath {
        let mut ids = self.0.clone();
        ids.push(id.to_string());
        NodePath(ids)
    }

    /// The ids as a slice.
    pub fn ids(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Broad error category, for callers deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed parameters, splits or structure.
    Validation,
    /// The requested layout does not fit the available space.
    OverConstrained,
    /// An external points at a box or face that does not exist.
    UnknownFaceReference,
    /// A node tag is not a known component.
    UnknownComponentType,
}

/// Errors that can occur while resolving an assembly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Divider split positions out of range or not strictly increasing.
    #[error("invalid split at '{path}': {message}")]
    InvalidSplit {
        /// Offending node.
        path: NodePath,
        /// What was wrong.
        message: String,
    },

    /// Parameters missing, mistyped or out of range.
    #[error("invalid parameters at '{path}': {message}")]
    InvalidParameters {
        /// Offending node.
        path: NodePath,
        /// What was wrong.
        message: String,
    },

    /// NaN, infinite or negative geometry.
    #[error("invalid geometry at '{path}': {source}")]
    InvalidGeometry {
        /// Offending node.
        path: NodePath,
        /// Underlying geometry error.
        #[source]
        source: GeometryError,
    },

    /// Tree structure violates a component's rules (child counts, duplicate ids).
    #[error("invalid structure at '{path}': {message}")]
    InvalidStructure {
        /// Offending node.
        path: NodePath,
        /// What was wrong.
        message: String,
    },

    /// Requested subdivision or fill does not fit.
    #[error("over-constrained at '{path}': {message}")]
    OverConstrained {
        /// Offending node.
        path: NodePath,
        /// What did not fit.
        message: String,
    },

    /// An external references a component, cell or face that is not resolved.
    #[error("external '{external}' references unknown face {face} of '{target}'{}", cell_suffix(.cell))]
    UnknownFaceReference {
        /// Id of the external.
        external: String,
        /// Path of the external.
        path: NodePath,
        /// Referenced component id.
        target: String,
        /// Referenced cell, if any.
        cell: Option<String>,
        /// Referenced face.
        face: Face,
    },

    /// Node tag not recognized.
    #[error("unknown component type '{tag}' at '{path}'")]
    UnknownComponentType {
        /// Offending node.
        path: NodePath,
        /// The unrecognized tag.
        tag: String,
    },
}

fn cell_suffix(cell: &Option<String>) -> String {
    match cell {
        Some(c) => format!(" (cell '{c}')"),
        None => String::new(),
    }
}

impl ResolveError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::InvalidSplit { .. }
            | ResolveError::InvalidParameters { .. }
            | ResolveError::InvalidGeometry { .. }
            | ResolveError::InvalidStructure { .. } => ErrorKind::Validation,
            ResolveError::OverConstrained { .. } => ErrorKind::OverConstrained,
            ResolveError::UnknownFaceReference { .. } => ErrorKind::UnknownFaceReference,
            ResolveError::UnknownComponentType { .. } => ErrorKind::UnknownComponentType,
        }
    }

    /// Path of the offending node.
    pub fn path(&self) -> &NodePath {
        match self {
            ResolveError::InvalidSplit { path, .. }
            | ResolveError::InvalidParameters { path, .. }
            | ResolveError::InvalidGeometry { path, .. }
            | ResolveError::InvalidStructure { path, .. }
            | ResolveError::OverConstrained { path, .. }
            | ResolveError::UnknownFaceReference { path, .. }
            | ResolveError::UnknownComponentType { path, .. } => path,
        }
    }

    pub(crate) fn from_schema(err: SchemaError, path: &NodePath) -> Self {
        match err {
            SchemaError::UnknownComponentType { tag, .. } => ResolveError::UnknownComponentType {
                path: path.clone(),
                tag,
            },
            SchemaError::InvalidParameters { message, .. } => ResolveError::InvalidParameters {
                path: path.clone(),
                message,
            },
        }
    }

    pub(crate) fn structure(path: &NodePath, message: impl Into<String>) -> Self {
        ResolveError::InvalidStructure {
            path: path.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn geometry(path: &NodePath, source: GeometryError) -> Self {
        ResolveError::InvalidGeometry {
            path: path.clone(),
            source,
        }
    }
}

/// A generator failure not yet tied to a node path.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fault {
    InvalidSplit(String),
    InvalidParameters(String),
    OverConstrained(String),
}

impl Fault {
    pub(crate) fn at(self, path: &NodePath) -> ResolveError {
        let path = path.clone();
        match self {
            Fault::InvalidSplit(message) => ResolveError::InvalidSplit { path, message },
            Fault::InvalidParameters(message) => ResolveError::InvalidParameters { path, message },
            Fault::OverConstrained(message) => ResolveError::OverConstrained { path, message },
        }
    }
}

/// Errors loading [`ResolveSettings`](crate::ResolveSettings).
#[derive(Error, Debug)]
pub enum SettingsError {
    /// TOML could not be parsed into settings.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

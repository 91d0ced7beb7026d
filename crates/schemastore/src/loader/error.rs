//! Error types for schema store operations
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::loader::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the schema store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store constructed without a schema root
    #[error("missing required configuration option `root'")]
    MissingRoot,

    /// Name or path that cannot be mapped
    #[error("invalid schema name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// No schema file at the mapped path
    #[error("could not find schema '{name}' at '{}'", path.display())]
    SchemaNotFound { name: String, path: PathBuf },

    /// File defines a different type than the one requested
    #[error("expected schema '{}' to define type '{name}', but it defines '{actual}'", path.display())]
    SchemaMismatch {
        name: String,
        path: PathBuf,
        actual: String,
    },

    /// Unnamed document whose file name is also claimed by a named type
    #[error("schema '{}' is unnamed but the type '{name}' is defined elsewhere", path.display())]
    AmbiguousSchema { name: String, path: PathBuf },

    /// File I/O errors other than a missing file
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("failed to parse JSON file '{}': {source}", path.display())]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("failed to parse YAML file '{}': {source}", path.display())]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Configured extension has no document deserializer
    #[error("unsupported schema file extension '{extension}'. Expected avsc, json, yaml or yml")]
    UnsupportedFormat { extension: String },

    /// Schema parser rejected the document
    #[error("invalid schema '{}': {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    /// Dependency still unresolved after it was loaded
    #[error("type '{name}' referenced by '{referenced_by}' is still unresolved after loading it")]
    UnresolvedReference { name: String, referenced_by: String },

    /// Cross-file cycle of unresolved references
    #[error("circular schema reference detected: {chain}")]
    CircularReference { chain: String },

    /// Resolution stack grew beyond the configured cap
    #[error("resolution depth {depth} exceeded while loading '{name}'")]
    ResolutionDepthExceeded { depth: usize, name: String },
}

impl StoreError {
    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(name: impl Into<String>, path: PathBuf) -> Self {
        Self::SchemaNotFound {
            name: name.into(),
            path,
        }
    }

    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::Io {
            path,
            source: error,
        }
    }

    /// Create a circular reference error from the resolution chain
    pub fn circular_reference(chain: &[String]) -> Self {
        Self::CircularReference {
            chain: chain.join(" -> "),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::SchemaNotFound { path, .. } => Some(path),
            Self::SchemaMismatch { path, .. } => Some(path),
            Self::AmbiguousSchema { path, .. } => Some(path),
            Self::Io { path, .. } => Some(path),
            Self::JsonParse { path, .. } => Some(path),
            Self::YamlParse { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether this error means a schema file was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SchemaNotFound { .. })
    }
}

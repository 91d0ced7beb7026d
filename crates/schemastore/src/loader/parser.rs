//! Parser contract and document deserialization
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{StoreError, StoreResult};
use crate::loader::resolver::ResolutionContext;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a [`SchemaParser`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A referenced named type is not present in the resolution context
    #[error("\"{name}\" is not a schema we know about")]
    UnresolvedReference { name: String },

    /// A named type is defined more than once
    #[error("the name \"{name}\" is already in use")]
    DuplicateName { name: String },

    /// Malformed schema content
    #[error("{reason}")]
    Invalid { reason: String },
}

impl ParseError {
    /// Create an unresolved reference error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedReference { name: name.into() }
    }

    /// Create an invalid content error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// A parsed schema that may carry its own fully-qualified name
pub trait NamedSchema {
    /// Self-reported fully-qualified name, if the schema is a named type
    fn fullname(&self) -> Option<&str>;
}

/// Turns a structured document into a schema object.
///
/// Implementations look up already-resolved names in `context` and insert the
/// named types they define, so nested definitions become resolvable on their
/// own. A reference that cannot be satisfied must be reported as
/// [`ParseError::UnresolvedReference`] carrying the fully-qualified name.
pub trait SchemaParser {
    type Schema: NamedSchema;

    fn parse(
        &self,
        document: &Value,
        context: &mut dyn ResolutionContext<Self::Schema>,
    ) -> Result<Arc<Self::Schema>, ParseError>;
}

/// Serialized document formats understood by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON (.avsc, .json)
    Json,
    /// YAML (.yaml, .yml)
    Yaml,
}

impl DocumentFormat {
    /// Detect format from a schema file extension
    pub fn from_extension(extension: &str) -> StoreResult<Self> {
        match extension.to_lowercase().as_str() {
            "avsc" | "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(StoreError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Deserialize raw file content into a generic document
    pub fn parse_content(&self, content: &str, path: &Path) -> StoreResult<Value> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| StoreError::JsonParse {
                path: path.to_path_buf(),
                source: e,
            }),
            DocumentFormat::Yaml => {
                let yaml_value: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| StoreError::YamlParse {
                        path: path.to_path_buf(),
                        source: e,
                    })?;

                // Convert to JSON Value for consistent handling
                serde_json::to_value(yaml_value).map_err(|e| StoreError::JsonParse {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_format_detection() {
        assert_eq!(DocumentFormat::from_extension("avsc").unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_extension("JSON").unwrap(), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_extension("yml").unwrap(), DocumentFormat::Yaml);
        assert!(matches!(
            DocumentFormat::from_extension("txt"),
            Err(StoreError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_parse_json_and_yaml() {
        let path = PathBuf::from("a.avsc");
        let json_doc = DocumentFormat::Json
            .parse_content(r#"{"type": "record", "name": "a", "fields": []}"#, &path)
            .unwrap();
        let yaml_doc = DocumentFormat::Yaml
            .parse_content("type: record\nname: a\nfields: []\n", &path)
            .unwrap();

        assert_eq!(json_doc, json!({"type": "record", "name": "a", "fields": []}));
        assert_eq!(json_doc, yaml_doc);
    }

    #[test]
    fn test_malformed_document() {
        let path = PathBuf::from("broken.avsc");
        let err = DocumentFormat::Json.parse_content("{", &path).unwrap_err();
        assert!(matches!(err, StoreError::JsonParse { .. }));
        assert_eq!(err.path(), Some(&path));
    }

    #[test]
    fn test_unresolved_message() {
        let err = ParseError::unresolved("b.B");
        assert_eq!(err.to_string(), "\"b.B\" is not a schema we know about");
    }
}

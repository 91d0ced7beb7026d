//! Schema loading and resolution
//!
//! This module provides:
//! - Mapping between fully-qualified names and schema file paths
//! - JSON and YAML document deserialization
//! - The parser contract and its resolution context
//! - In-memory caching of resolved schemas
//! - On-demand loading of dependencies with cycle detection
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use schemastore::loader::SchemaStore;
//!
//! let mut store = SchemaStore::new("schemas");
//! let widget = store.find("Widget", Some("com.example"))?;
//! println!("{}", widget.to_json());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod error;
pub mod naming;
pub mod parser;
pub mod resolver;
pub mod schema_loader;

pub use cache::SchemaCache;
pub use error::{StoreError, StoreResult};
pub use naming::{make_fullname, name_to_path, path_to_name};
pub use parser::{DocumentFormat, NamedSchema, ParseError, SchemaParser};
pub use resolver::{Journal, ResolutionContext, ResolutionScope, ResolutionStack, DEFAULT_MAX_RESOLUTION_DEPTH};
pub use schema_loader::{SchemaStore, StoreConfig, StoreStats, DEFAULT_EXTENSION};

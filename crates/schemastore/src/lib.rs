//! SchemaStore - directory-backed schema resolution
//!
//! A [`SchemaStore`] maps fully-qualified schema names onto files under a root
//! directory, parses each file at most once and shares the result through
//! `Arc`. When a schema refers to a named type that is not loaded yet, the
//! store loads the dependency from its own file and parses the dependent
//! schema again.
//!
//! ## Layout
//!
//! A schema named `com.example.Widget` lives at
//! `<root>/com/example/Widget.avsc`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemastore::SchemaStore;
//!
//! let mut store = SchemaStore::new("schemas");
//!
//! // Load everything under the root
//! for name in store.load_all()? {
//!     println!("loaded {}", name);
//! }
//!
//! // Resolved schemas are shared
//! let a = store.find("com.example.Widget", None)?;
//! let b = store.find("Widget", Some("com.example"))?;
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//! # Ok::<(), schemastore::StoreError>(())
//! ```
//!
//! ## Custom Parsers
//!
//! Any [`SchemaParser`] can back a store through
//! [`SchemaStore::with_config`]. The parser reports missing named types as
//! [`ParseError::UnresolvedReference`] and the store takes care of loading
//! them.
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

pub mod avro;
pub mod loader;

// Re-export commonly used types for convenience
pub use avro::{AvroParser, Schema};
pub use loader::{
    NamedSchema, ParseError, ResolutionContext, SchemaParser, SchemaStore, StoreConfig,
    StoreError, StoreResult, StoreStats,
};

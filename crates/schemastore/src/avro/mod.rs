//! Avro schema support
//!
//! The default [`SchemaParser`](crate::loader::SchemaParser) used by the store.
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

pub mod parser;
pub mod types;

pub use parser::AvroParser;
pub use types::{EnumSchema, FixedSchema, RecordField, RecordSchema, Schema, PRIMITIVE_TYPES};

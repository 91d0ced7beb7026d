//! Parsed Avro schema representation
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::loader::parser::NamedSchema;
use serde_json::{json, Map, Value};

/// Avro primitive type names
pub const PRIMITIVE_TYPES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

/// A parsed Avro schema.
///
/// References to named types defined elsewhere are kept by name
/// ([`Schema::Ref`]) and resolved through the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Array(Box<Schema>),
    Map(Box<Schema>),
    Union(Vec<Schema>),
    Record(RecordSchema),
    Enum(EnumSchema),
    Fixed(FixedSchema),
    /// Reference to a named type by fully-qualified name
    Ref(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub fullname: String,
    pub doc: Option<String>,
    pub fields: Vec<RecordField>,
    /// Declared with `"type": "error"`
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub schema: Schema,
    pub default: Option<Value>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub fullname: String,
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    pub fullname: String,
    pub size: usize,
}

impl Schema {
    /// Primitive schema for a primitive type name
    pub fn primitive(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Schema::Null),
            "boolean" => Some(Schema::Boolean),
            "int" => Some(Schema::Int),
            "long" => Some(Schema::Long),
            "float" => Some(Schema::Float),
            "double" => Some(Schema::Double),
            "bytes" => Some(Schema::Bytes),
            "string" => Some(Schema::String),
            _ => None,
        }
    }

    /// Avro type name of this schema
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::Null => "null",
            Schema::Boolean => "boolean",
            Schema::Int => "int",
            Schema::Long => "long",
            Schema::Float => "float",
            Schema::Double => "double",
            Schema::Bytes => "bytes",
            Schema::String => "string",
            Schema::Array(_) => "array",
            Schema::Map(_) => "map",
            Schema::Union(_) => "union",
            Schema::Record(record) if record.is_error => "error",
            Schema::Record(_) => "record",
            Schema::Enum(_) => "enum",
            Schema::Fixed(_) => "fixed",
            Schema::Ref(_) => "reference",
        }
    }

    /// Fully-qualified name of a named type or reference
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Record(record) => Some(record.fullname.as_str()),
            Schema::Enum(schema) => Some(schema.fullname.as_str()),
            Schema::Fixed(schema) => Some(schema.fullname.as_str()),
            Schema::Ref(fullname) => Some(fullname.as_str()),
            _ => None,
        }
    }

    /// Fully-qualified names this schema refers to without defining them
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names.sort_unstable();
        names.dedup();
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Schema::Ref(fullname) => names.push(fullname.as_str()),
            Schema::Array(inner) | Schema::Map(inner) => inner.collect_references(names),
            Schema::Union(variants) => {
                for variant in variants {
                    variant.collect_references(names);
                }
            }
            Schema::Record(record) => {
                for field in &record.fields {
                    field.schema.collect_references(names);
                }
            }
            _ => {}
        }
    }

    /// Render the schema back into an Avro JSON document
    pub fn to_json(&self) -> Value {
        match self {
            Schema::Array(items) => json!({"type": "array", "items": items.to_json()}),
            Schema::Map(values) => json!({"type": "map", "values": values.to_json()}),
            Schema::Union(variants) => Value::Array(variants.iter().map(Schema::to_json).collect()),
            Schema::Record(record) => {
                let fields: Vec<Value> = record
                    .fields
                    .iter()
                    .map(|field| {
                        let mut obj = Map::new();
                        obj.insert("name".to_string(), json!(field.name));
                        obj.insert("type".to_string(), field.schema.to_json());
                        if let Some(default) = &field.default {
                            obj.insert("default".to_string(), default.clone());
                        }
                        if let Some(doc) = &field.doc {
                            obj.insert("doc".to_string(), json!(doc));
                        }
                        Value::Object(obj)
                    })
                    .collect();

                let mut obj = Map::new();
                obj.insert("type".to_string(), json!(self.type_name()));
                obj.insert("name".to_string(), json!(record.fullname));
                if let Some(doc) = &record.doc {
                    obj.insert("doc".to_string(), json!(doc));
                }
                obj.insert("fields".to_string(), Value::Array(fields));
                Value::Object(obj)
            }
            Schema::Enum(schema) => {
                let mut obj = Map::new();
                obj.insert("type".to_string(), json!("enum"));
                obj.insert("name".to_string(), json!(schema.fullname));
                if let Some(doc) = &schema.doc {
                    obj.insert("doc".to_string(), json!(doc));
                }
                obj.insert("symbols".to_string(), json!(schema.symbols));
                Value::Object(obj)
            }
            Schema::Fixed(schema) => {
                json!({"type": "fixed", "name": schema.fullname, "size": schema.size})
            }
            Schema::Ref(fullname) => json!(fullname),
            primitive => json!(primitive.type_name()),
        }
    }
}

impl NamedSchema for Schema {
    fn fullname(&self) -> Option<&str> {
        match self {
            Schema::Ref(_) => None,
            named => named.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn widget() -> Schema {
        Schema::Record(RecordSchema {
            fullname: "com.example.Widget".to_string(),
            doc: None,
            fields: vec![
                RecordField {
                    name: "id".to_string(),
                    schema: Schema::Long,
                    default: None,
                    doc: Some("primary key".to_string()),
                },
                RecordField {
                    name: "color".to_string(),
                    schema: Schema::Union(vec![Schema::Null, Schema::Ref("com.example.Color".to_string())]),
                    default: Some(Value::Null),
                    doc: None,
                },
            ],
            is_error: false,
        })
    }

    #[test]
    fn test_named_schema() {
        assert_eq!(widget().fullname(), Some("com.example.Widget"));
        assert_eq!(Schema::Ref("a.B".to_string()).fullname(), None);
        assert_eq!(Schema::Int.fullname(), None);
    }

    #[test]
    fn test_references() {
        assert_eq!(widget().references(), vec!["com.example.Color"]);
        assert!(Schema::Array(Box::new(Schema::String)).references().is_empty());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(
            widget().to_json(),
            json!({
                "type": "record",
                "name": "com.example.Widget",
                "fields": [
                    {"name": "id", "type": "long", "doc": "primary key"},
                    {"name": "color", "type": ["null", "com.example.Color"], "default": null}
                ]
            })
        );
        assert_eq!(
            Schema::Map(Box::new(Schema::Bytes)).to_json(),
            json!({"type": "map", "values": "bytes"})
        );
    }

    #[test]
    fn test_primitive_lookup() {
        for name in PRIMITIVE_TYPES {
            assert_eq!(Schema::primitive(name).map(|s| s.type_name()), Some(name));
        }
        assert!(Schema::primitive("record").is_none());
    }
}

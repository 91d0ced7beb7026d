//! Avro schema parser
//!
//! Parses Avro JSON schema documents, resolving named-type references
//! against a [`ResolutionContext`].
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::avro::types::{EnumSchema, FixedSchema, RecordField, RecordSchema, Schema};
use crate::loader::parser::{ParseError, SchemaParser};
use crate::loader::resolver::ResolutionContext;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Parser for Avro JSON schema documents
#[derive(Debug, Default, Clone, Copy)]
pub struct AvroParser;

impl AvroParser {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaParser for AvroParser {
    type Schema = Schema;

    fn parse(
        &self,
        document: &Value,
        context: &mut dyn ResolutionContext<Schema>,
    ) -> Result<Arc<Schema>, ParseError> {
        let mut state = ParseState {
            context,
            defining: Vec::new(),
        };
        let schema = state.parse_value(document, None)?;

        // Named types were already registered; hand back the shared instance.
        if let Some(fullname) = schema.name() {
            if let Some(registered) = state.context.lookup(fullname) {
                if **registered == schema {
                    return Ok(Arc::clone(registered));
                }
            }
        }
        Ok(Arc::new(schema))
    }
}

struct ParseState<'c> {
    context: &'c mut dyn ResolutionContext<Schema>,
    /// Named types whose definition is still open, outermost first
    defining: Vec<String>,
}

impl ParseState<'_> {
    fn parse_value(&mut self, json: &Value, namespace: Option<&str>) -> Result<Schema, ParseError> {
        match json {
            Value::String(type_name) => self.parse_type_name(type_name, namespace),
            Value::Array(variants) => self.parse_union(variants, namespace),
            Value::Object(obj) => self.parse_object(obj, namespace),
            other => Err(ParseError::invalid(format!("{} is not a valid schema", other))),
        }
    }

    fn parse_type_name(&self, type_name: &str, namespace: Option<&str>) -> Result<Schema, ParseError> {
        if let Some(primitive) = Schema::primitive(type_name) {
            return Ok(primitive);
        }

        let fullname = qualify(type_name, namespace)?;
        if self.is_known(&fullname) {
            Ok(Schema::Ref(fullname))
        } else {
            Err(ParseError::unresolved(fullname))
        }
    }

    fn parse_union(&mut self, variants: &[Value], namespace: Option<&str>) -> Result<Schema, ParseError> {
        let mut seen = HashSet::new();
        let mut schemas = Vec::with_capacity(variants.len());

        for variant in variants {
            let schema = self.parse_value(variant, namespace)?;
            if matches!(schema, Schema::Union(_)) {
                return Err(ParseError::invalid("unions may not immediately contain other unions"));
            }

            let key = schema.name().unwrap_or(schema.type_name()).to_string();
            if !seen.insert(key.clone()) {
                return Err(ParseError::invalid(format!("union contains more than one '{}'", key)));
            }
            schemas.push(schema);
        }

        Ok(Schema::Union(schemas))
    }

    fn parse_object(&mut self, obj: &Map<String, Value>, namespace: Option<&str>) -> Result<Schema, ParseError> {
        let type_value = obj
            .get("type")
            .ok_or_else(|| ParseError::invalid("no \"type\" property"))?;

        let type_name = match type_value {
            Value::String(type_name) => type_name.as_str(),
            nested @ (Value::Object(_) | Value::Array(_)) => return self.parse_value(nested, namespace),
            other => return Err(ParseError::invalid(format!("invalid \"type\": {}", other))),
        };

        match type_name {
            "record" | "error" => self.parse_record(obj, namespace, type_name == "error"),
            "enum" => self.parse_enum(obj, namespace),
            "fixed" => self.parse_fixed(obj, namespace),
            "array" => {
                let items = obj
                    .get("items")
                    .ok_or_else(|| ParseError::invalid("array schema requires \"items\""))?;
                Ok(Schema::Array(Box::new(self.parse_value(items, namespace)?)))
            }
            "map" => {
                let values = obj
                    .get("values")
                    .ok_or_else(|| ParseError::invalid("map schema requires \"values\""))?;
                Ok(Schema::Map(Box::new(self.parse_value(values, namespace)?)))
            }
            other => self.parse_type_name(other, namespace),
        }
    }

    fn parse_record(
        &mut self,
        obj: &Map<String, Value>,
        namespace: Option<&str>,
        is_error: bool,
    ) -> Result<Schema, ParseError> {
        let fullname = self.begin_named(obj, namespace)?;
        let child_namespace = namespace_of(&fullname);

        let fields_json = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| ParseError::invalid(format!("record '{}' requires a \"fields\" array", fullname)))?;

        let mut field_names = HashSet::new();
        let mut fields = Vec::with_capacity(fields_json.len());
        for field in fields_json {
            let field = field
                .as_object()
                .ok_or_else(|| ParseError::invalid(format!("field of '{}' is not an object", fullname)))?;

            let name = field
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ParseError::invalid(format!("field of '{}' requires a \"name\"", fullname)))?;
            validate_identifier(name)?;
            if !field_names.insert(name) {
                return Err(ParseError::invalid(format!("duplicate field '{}' in '{}'", name, fullname)));
            }

            let field_type = field
                .get("type")
                .ok_or_else(|| ParseError::invalid(format!("field '{}' requires a \"type\"", name)))?;

            fields.push(RecordField {
                name: name.to_string(),
                schema: self.parse_value(field_type, child_namespace)?,
                default: field.get("default").cloned(),
                doc: doc_of(field),
            });
        }

        let schema = Schema::Record(RecordSchema {
            fullname: fullname.clone(),
            doc: doc_of(obj),
            fields,
            is_error,
        });
        Ok(self.finish_named(fullname, schema))
    }

    fn parse_enum(&mut self, obj: &Map<String, Value>, namespace: Option<&str>) -> Result<Schema, ParseError> {
        let fullname = self.begin_named(obj, namespace)?;

        let symbols_json = obj
            .get("symbols")
            .and_then(Value::as_array)
            .ok_or_else(|| ParseError::invalid(format!("enum '{}' requires a \"symbols\" array", fullname)))?;

        let mut symbols: Vec<String> = Vec::with_capacity(symbols_json.len());
        for symbol in symbols_json {
            let symbol = symbol
                .as_str()
                .ok_or_else(|| ParseError::invalid(format!("symbols of '{}' must be strings", fullname)))?;
            validate_identifier(symbol)?;
            if symbols.iter().any(|existing| existing == symbol) {
                return Err(ParseError::invalid(format!("duplicate symbol '{}' in '{}'", symbol, fullname)));
            }
            symbols.push(symbol.to_string());
        }

        let schema = Schema::Enum(EnumSchema {
            fullname: fullname.clone(),
            doc: doc_of(obj),
            symbols,
        });
        Ok(self.finish_named(fullname, schema))
    }

    fn parse_fixed(&mut self, obj: &Map<String, Value>, namespace: Option<&str>) -> Result<Schema, ParseError> {
        let fullname = self.begin_named(obj, namespace)?;

        let size = obj
            .get("size")
            .and_then(Value::as_u64)
            .and_then(|size| usize::try_from(size).ok())
            .ok_or_else(|| ParseError::invalid(format!("fixed '{}' requires a non-negative \"size\"", fullname)))?;

        let schema = Schema::Fixed(FixedSchema {
            fullname: fullname.clone(),
            size,
        });
        Ok(self.finish_named(fullname, schema))
    }

    /// Open the definition of a named type
    fn begin_named(&mut self, obj: &Map<String, Value>, namespace: Option<&str>) -> Result<String, ParseError> {
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::invalid("named type requires a \"name\""))?;

        let fullname = match obj.get("namespace") {
            None | Some(Value::Null) => qualify(name, namespace)?,
            Some(Value::String(explicit)) => qualify(name, Some(explicit.as_str()))?,
            Some(other) => return Err(ParseError::invalid(format!("invalid \"namespace\": {}", other))),
        };

        if self.is_known(&fullname) {
            return Err(ParseError::DuplicateName { name: fullname });
        }

        self.defining.push(fullname.clone());
        Ok(fullname)
    }

    /// Close a named type and make it resolvable through the context
    fn finish_named(&mut self, fullname: String, schema: Schema) -> Schema {
        self.defining.retain(|name| name != &fullname);
        self.context.insert(fullname, Arc::new(schema.clone()));
        schema
    }

    fn is_known(&self, fullname: &str) -> bool {
        self.defining.iter().any(|name| name == fullname) || self.context.lookup(fullname).is_some()
    }
}

/// Fully-qualified name of `name` within `namespace`
fn qualify(name: &str, namespace: Option<&str>) -> Result<String, ParseError> {
    let fullname = match namespace {
        Some(ns) if !ns.is_empty() && !name.contains('.') => format!("{}.{}", ns, name),
        _ => name.to_string(),
    };

    for segment in fullname.split('.') {
        validate_identifier(segment)
            .map_err(|_| ParseError::invalid(format!("invalid type name '{}'", fullname)))?;
    }
    Ok(fullname)
}

/// Namespace part of a fully-qualified name
fn namespace_of(fullname: &str) -> Option<&str> {
    fullname.rsplit_once('.').map(|(namespace, _)| namespace)
}

fn validate_identifier(identifier: &str) -> Result<(), ParseError> {
    let mut chars = identifier.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ParseError::invalid(format!("invalid name '{}'", identifier)))
    }
}

fn doc_of(obj: &Map<String, Value>) -> Option<String> {
    obj.get("doc").and_then(Value::as_str).map(str::to_string)
}

//! JSON Schema operation converter.
//!
//! Default implementation of [`OperationSchemaPort`] that renders each
//! operation as a tool descriptor `{name, description, inputSchema}` with a
//! JSON Schema (draft 2020-12 subset) generated from the declarative schema.

use anf_application::ports::operation_schema::OperationSchemaPort;
use anf_domain::{OperationDefinition, RiskLevel, Schema};
use serde_json::{Map, Value, json};

/// Default implementation producing JSON Schema tool descriptors.
///
/// Mapping:
/// - `String` → `"string"` with `minLength`/`maxLength`/`pattern`
/// - `Integer` / `Number` → `minimum`/`maximum`
/// - `Enum` → `"string"` with `enum`
/// - `Uuid` → `"string"` with `format: "uuid"`
/// - `Object` → `properties`, `required`, `additionalProperties`
/// - `Union` → `anyOf`
/// - `Any` → `{}` (accepts anything)
pub struct JsonSchemaConverter;

impl JsonSchemaConverter {
    pub fn schema_to_json(schema: &Schema) -> Value {
        match schema {
            Schema::String(s) => {
                let mut out = type_object("string");
                insert_opt(&mut out, "minLength", s.min_length);
                insert_opt(&mut out, "maxLength", s.max_length);
                if let Some(pattern) = &s.pattern {
                    out.insert("pattern".to_string(), json!(pattern.as_str()));
                }
                Value::Object(out)
            }
            Schema::Integer(s) => {
                let mut out = type_object("integer");
                insert_opt(&mut out, "minimum", s.minimum);
                insert_opt(&mut out, "maximum", s.maximum);
                Value::Object(out)
            }
            Schema::Number(s) => {
                let mut out = type_object("number");
                insert_opt(&mut out, "minimum", s.minimum);
                insert_opt(&mut out, "maximum", s.maximum);
                Value::Object(out)
            }
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Enum(values) => json!({"type": "string", "enum": values}),
            Schema::Uuid => json!({"type": "string", "format": "uuid"}),
            Schema::Object(object) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in &object.fields {
                    let mut prop = match Self::schema_to_json(&field.schema) {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    };
                    prop.insert("description".to_string(), json!(field.description));
                    if let Some(default) = &field.default {
                        prop.insert("default".to_string(), default.clone());
                    }
                    properties.insert(field.name.clone(), Value::Object(prop));
                    if field.required {
                        required.push(json!(field.name));
                    }
                }
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": object.additional_properties,
                })
            }
            Schema::Array(array) => {
                let mut out = type_object("array");
                out.insert("items".to_string(), Self::schema_to_json(&array.items));
                insert_opt(&mut out, "minItems", array.min_items);
                insert_opt(&mut out, "maxItems", array.max_items);
                Value::Object(out)
            }
            Schema::Union(alternatives) => json!({
                "anyOf": alternatives.iter().map(Self::schema_to_json).collect::<Vec<_>>(),
            }),
            Schema::Any => json!({}),
        }
    }
}

impl OperationSchemaPort for JsonSchemaConverter {
    fn operation_to_tool(&self, operation: &OperationDefinition) -> Value {
        json!({
            "name": operation.name,
            "description": operation.description,
            "inputSchema": Self::schema_to_json(&operation.schema),
            "annotations": {
                "readOnlyHint": operation.risk_level() == RiskLevel::Low,
            },
        })
    }
}

fn type_object(name: &str) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("type".to_string(), json!(name));
    out
}

fn insert_opt<T: Into<Value>>(out: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value.into());
    }
}

//! Schema validation
//!
//! Contains the pure validation logic that gates every dispatch. Validation
//! never performs I/O and never stops at the first problem: the caller gets
//! every violated constraint so all of them can be fixed in one round trip.

use serde_json::{Map, Value};

use super::entities::{ArraySchema, IntegerSchema, NumberSchema, ObjectSchema, Schema, StringSchema};
use super::value_objects::ValidationIssue;

/// Validator for raw operation arguments
///
/// On success the returned value has the same shape as the schema with
/// defaults filled in for omitted optional fields.
pub trait SchemaValidator {
    fn validate(&self, schema: &Schema, args: &Value) -> Result<Value, Vec<ValidationIssue>>;
}

/// Default implementation of SchemaValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultSchemaValidator;

impl SchemaValidator for DefaultSchemaValidator {
    fn validate(&self, schema: &Schema, args: &Value) -> Result<Value, Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let value = check(schema, args, "", &mut issues);
        if issues.is_empty() {
            Ok(value)
        } else {
            Err(issues)
        }
    }
}

fn check(schema: &Schema, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) -> Value {
    match schema {
        Schema::String(s) => check_string(s, value, path, issues),
        Schema::Integer(s) => check_integer(s, value, path, issues),
        Schema::Number(s) => check_number(s, value, path, issues),
        Schema::Boolean => {
            if !value.is_boolean() {
                issues.push(type_mismatch(path, "a boolean", value));
            }
            value.clone()
        }
        Schema::Enum(allowed) => {
            match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => {}
                Some(_) => issues.push(ValidationIssue::new(
                    path,
                    format!("must be one of: {}", allowed.join(", ")),
                )),
                None => issues.push(type_mismatch(path, "a string", value)),
            }
            value.clone()
        }
        Schema::Uuid => {
            match value.as_str() {
                Some(s) if is_uuid(s) => {}
                Some(_) => issues.push(ValidationIssue::new(path, "must be a valid UUID")),
                None => issues.push(type_mismatch(path, "a UUID string", value)),
            }
            value.clone()
        }
        Schema::Object(s) => check_object(s, value, path, issues),
        Schema::Array(s) => check_array(s, value, path, issues),
        Schema::Union(alternatives) => check_union(alternatives, value, path, issues),
        Schema::Any => value.clone(),
    }
}

fn check_string(
    schema: &StringSchema,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Value {
    let Some(s) = value.as_str() else {
        issues.push(type_mismatch(path, "a string", value));
        return value.clone();
    };

    let len = s.chars().count();
    if let Some(min) = schema.min_length
        && len < min
    {
        issues.push(ValidationIssue::new(
            path,
            format!("must be at least {} characters", min),
        ));
    }
    if let Some(max) = schema.max_length
        && len > max
    {
        issues.push(ValidationIssue::new(
            path,
            format!("must be at most {} characters", max),
        ));
    }
    if let Some(pattern) = &schema.pattern
        && !pattern.is_match(s)
    {
        issues.push(ValidationIssue::new(
            path,
            format!("does not match pattern {}", pattern.as_str()),
        ));
    }
    value.clone()
}

fn check_integer(
    schema: &IntegerSchema,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Value {
    let n = match value.as_i64() {
        Some(n) => n,
        // 4.0 is an integer that happens to be spelled as a float
        None if value.as_f64().is_some_and(|f| f.fract() == 0.0 && f.abs() < 9.0e15) => {
            value.as_f64().unwrap_or_default() as i64
        }
        None if value.is_u64() => {
            issues.push(ValidationIssue::new(path, "is too large"));
            return value.clone();
        }
        None if value.is_number() => {
            issues.push(ValidationIssue::new(path, "must be an integer"));
            return value.clone();
        }
        None => {
            issues.push(type_mismatch(path, "an integer", value));
            return value.clone();
        }
    };

    if let Some(min) = schema.minimum
        && n < min
    {
        issues.push(ValidationIssue::new(path, format!("must be at least {}", min)));
    }
    if let Some(max) = schema.maximum
        && n > max
    {
        issues.push(ValidationIssue::new(path, format!("must be at most {}", max)));
    }
    value.clone()
}

fn check_number(
    schema: &NumberSchema,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Value {
    let Some(n) = value.as_f64() else {
        issues.push(type_mismatch(path, "a number", value));
        return value.clone();
    };

    if let Some(min) = schema.minimum
        && n < min
    {
        issues.push(ValidationIssue::new(path, format!("must be at least {}", min)));
    }
    if let Some(max) = schema.maximum
        && n > max
    {
        issues.push(ValidationIssue::new(path, format!("must be at most {}", max)));
    }
    value.clone()
}

fn check_object(
    schema: &ObjectSchema,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Value {
    let Some(object) = value.as_object() else {
        issues.push(type_mismatch(path, "an object", value));
        return value.clone();
    };

    let mut output = Map::new();

    for field in &schema.fields {
        let field_path = join_key(path, &field.name);
        // An explicit null counts as "not provided"
        match object.get(&field.name).filter(|v| !v.is_null()) {
            Some(v) => {
                let checked = check(&field.schema, v, &field_path, issues);
                output.insert(field.name.clone(), checked);
            }
            None if field.required => {
                issues.push(ValidationIssue::new(field_path, "is required"));
            }
            None => {
                if let Some(default) = &field.default {
                    output.insert(field.name.clone(), default.clone());
                }
            }
        }
    }

    for (key, v) in object {
        if schema.has_field(key) {
            continue;
        }
        if schema.additional_properties {
            output.insert(key.clone(), v.clone());
        } else {
            issues.push(ValidationIssue::new(
                join_key(path, key),
                "is not a recognized parameter",
            ));
        }
    }

    Value::Object(output)
}

fn check_array(
    schema: &ArraySchema,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Value {
    let Some(items) = value.as_array() else {
        issues.push(type_mismatch(path, "an array", value));
        return value.clone();
    };

    if let Some(min) = schema.min_items
        && items.len() < min
    {
        issues.push(ValidationIssue::new(
            path,
            format!("must contain at least {} items", min),
        ));
    }
    if let Some(max) = schema.max_items
        && items.len() > max
    {
        issues.push(ValidationIssue::new(
            path,
            format!("must contain at most {} items", max),
        ));
    }

    let checked = items
        .iter()
        .enumerate()
        .map(|(i, item)| check(&schema.items, item, &format!("{}[{}]", path, i), issues))
        .collect();
    Value::Array(checked)
}

fn check_union(
    alternatives: &[Schema],
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Value {
    for alternative in alternatives {
        let mut scratch = Vec::new();
        let checked = check(alternative, value, path, &mut scratch);
        if scratch.is_empty() {
            return checked;
        }
    }
    let shapes: Vec<&str> = alternatives.iter().map(Schema::type_name).collect();
    issues.push(ValidationIssue::new(
        path,
        format!("does not match any allowed shape ({})", shapes.join(" | ")),
    ));
    value.clone()
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn type_mismatch(path: &str, expected: &str, found: &Value) -> ValidationIssue {
    ValidationIssue::new(
        path,
        format!("expected {}, got {}", expected, json_type(found)),
    )
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Canonical textual UUID: 8-4-4-4-12 hex digits
pub fn is_uuid(s: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}

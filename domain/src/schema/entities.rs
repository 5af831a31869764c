//! Declarative parameter schemas
//!
//! A [`Schema`] describes the shape an operation's raw JSON arguments must
//! have. Schemas are plain data: they are built once when the operation
//! catalog is assembled and never mutated afterwards.

use regex::Regex;
use serde_json::Value;

use crate::core::error::DomainError;

/// A compiled regular expression used as a string constraint.
///
/// Compilation happens once, when the catalog is built, so a bad pattern is a
/// startup failure rather than a per-call failure.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|e| DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Shape of a JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Integer(IntegerSchema),
    Number(NumberSchema),
    Boolean,
    /// String restricted to a fixed set of literals
    Enum(Vec<String>),
    /// Canonical 8-4-4-4-12 hex UUID string
    Uuid,
    Object(ObjectSchema),
    Array(ArraySchema),
    /// Value must match at least one alternative; the first match wins
    Union(Vec<Schema>),
    /// Free-form JSON, no constraint
    Any,
}

impl Schema {
    pub fn string() -> StringSchema {
        StringSchema::default()
    }

    pub fn integer() -> IntegerSchema {
        IntegerSchema::default()
    }

    pub fn number() -> NumberSchema {
        NumberSchema::default()
    }

    pub fn enumeration<I, S>(values: I) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    pub fn array(items: impl Into<Schema>) -> ArraySchema {
        ArraySchema {
            items: Box::new(items.into()),
            min_items: None,
            max_items: None,
        }
    }

    pub fn union(alternatives: Vec<Schema>) -> Schema {
        Schema::Union(alternatives)
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(object) => Some(object),
            _ => None,
        }
    }

    /// JSON type name used in diagnostics and schema export
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) | Schema::Enum(_) | Schema::Uuid => "string",
            Schema::Integer(_) => "integer",
            Schema::Number(_) => "number",
            Schema::Boolean => "boolean",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Union(_) | Schema::Any => "any",
        }
    }
}

/// String constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
}

impl StringSchema {
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

impl From<StringSchema> for Schema {
    fn from(value: StringSchema) -> Self {
        Schema::String(value)
    }
}

/// Integer constraints (inclusive bounds)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerSchema {
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

impl IntegerSchema {
    pub fn minimum(mut self, min: i64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: i64) -> Self {
        self.maximum = Some(max);
        self
    }
}

impl From<IntegerSchema> for Schema {
    fn from(value: IntegerSchema) -> Self {
        Schema::Integer(value)
    }
}

/// Floating-point constraints (inclusive bounds)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl NumberSchema {
    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }
}

impl From<NumberSchema> for Schema {
    fn from(value: NumberSchema) -> Self {
        Schema::Number(value)
    }
}

/// Object shape: named fields plus a policy for unknown keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    /// Whether keys not listed in `fields` are accepted and passed through
    pub additional_properties: bool,
}

impl ObjectSchema {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Accept and pass through keys that are not declared
    pub fn open(mut self) -> Self {
        self.additional_properties = true;
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(value: ObjectSchema) -> Self {
        Schema::Object(value)
    }
}

/// Array shape
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl ArraySchema {
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
}

impl From<ArraySchema> for Schema {
    fn from(value: ArraySchema) -> Self {
        Schema::Array(value)
    }
}

/// A named member of an [`ObjectSchema`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: String,
    pub schema: Schema,
    pub required: bool,
    /// Value substituted when the field is omitted (only for optional fields)
    pub default: Option<Value>,
}

impl Field {
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: impl Into<Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: schema.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: impl Into<Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: schema.into(),
            required: false,
            default: None,
        }
    }

    /// Make the field optional with a default applied when omitted
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(default.into());
        self
    }
}

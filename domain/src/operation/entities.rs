//! Operation domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::path::{PathTemplate, encode, scalar_arg};
use super::value_objects::ApiRequest;
use crate::core::error::DomainError;
use crate::schema::Schema;

/// HTTP verb of a management API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Patch,
    Delete,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Post => "POST",
        }
    }

    /// Only mutating verbs are allowed to carry a JSON body
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only (GET)
    Low,
    /// Creates, modifies or deletes resources
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the JSON request body comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// A single argument whose value is sent as the body (usually `body`)
    Param(String),
    /// Several top-level arguments collected into one object; absent ones are skipped
    Fields(Vec<String>),
    /// A single argument in flat form, reshaped into an ARM resource envelope:
    /// envelope keys stay at the top level and everything else moves under
    /// `properties`
    Resource(String),
}

/// Keys that belong on an ARM resource itself rather than under `properties`
pub const RESOURCE_ENVELOPE_KEYS: [&str; 6] =
    ["location", "tags", "zones", "identity", "etag", "properties"];

/// A query parameter bound from an argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    /// Name on the wire (`metricnames`)
    pub wire: String,
    /// Argument it is read from (`metricName`)
    pub arg: String,
}

/// How an implemented operation maps onto a REST call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestBinding {
    pub method: HttpMethod,
    pub path: PathTemplate,
    pub api_version: String,
    pub body: Option<BodySource>,
    pub query: Vec<QueryParam>,
}

impl RestBinding {
    pub fn new(method: HttpMethod, path: PathTemplate, api_version: impl Into<String>) -> Self {
        Self {
            method,
            path,
            api_version: api_version.into(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn with_body_param(mut self, name: impl Into<String>) -> Self {
        self.body = Some(BodySource::Param(name.into()));
        self
    }

    pub fn with_resource_body(mut self, name: impl Into<String>) -> Self {
        self.body = Some(BodySource::Resource(name.into()));
        self
    }

    pub fn with_body_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = Some(BodySource::Fields(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_query(mut self, wire: impl Into<String>, arg: impl Into<String>) -> Self {
        self.query.push(QueryParam {
            wire: wire.into(),
            arg: arg.into(),
        });
        self
    }

    /// Build the concrete request from validated arguments
    ///
    /// The path always ends with the fixed `api-version`; optional query
    /// parameters follow only when the argument is present. A body is
    /// produced only for verbs that carry one.
    pub fn resolve(&self, args: &Value) -> Result<ApiRequest, DomainError> {
        let mut path = self.path.resolve(args)?;
        path.push_str("?api-version=");
        path.push_str(&encode(&self.api_version));

        for param in &self.query {
            if let Some(value) = scalar_arg(args, &param.arg)? {
                path.push('&');
                path.push_str(&encode(&param.wire));
                path.push('=');
                path.push_str(&encode(&value));
            }
        }

        let body = if self.method.carries_body() {
            self.body.as_ref().and_then(|source| collect_body(source, args))
        } else {
            None
        };

        Ok(ApiRequest {
            method: self.method,
            path,
            body,
        })
    }
}

fn collect_body(source: &BodySource, args: &Value) -> Option<Value> {
    match source {
        BodySource::Param(name) => args.get(name).filter(|v| !v.is_null()).cloned(),
        BodySource::Fields(names) => {
            let object: Map<String, Value> = names
                .iter()
                .filter_map(|name| {
                    args.get(name)
                        .filter(|v| !v.is_null())
                        .map(|v| (name.clone(), v.clone()))
                })
                .collect();
            Some(Value::Object(object))
        }
        BodySource::Resource(name) => match args.get(name) {
            Some(Value::Object(flat)) => Some(into_resource_envelope(flat)),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.clone()),
        },
    }
}

fn into_resource_envelope(flat: &Map<String, Value>) -> Value {
    let mut envelope = Map::new();
    let mut properties = Map::new();
    for (key, value) in flat {
        if key == "properties" {
            if let Value::Object(explicit) = value {
                properties.extend(explicit.clone());
            }
        } else if RESOURCE_ENVELOPE_KEYS.contains(&key.as_str()) {
            envelope.insert(key.clone(), value.clone());
        } else {
            properties.insert(key.clone(), value.clone());
        }
    }
    if !properties.is_empty() {
        envelope.insert("properties".to_string(), Value::Object(properties));
    }
    Value::Object(envelope)
}

/// What happens when an operation is dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationHandler {
    /// Wired to the management API
    Rest(RestBinding),
    /// Registered but not built; dispatch returns a placeholder result
    Stub,
}

/// Descriptor of one callable management operation
#[derive(Debug, Clone)]
pub struct OperationDefinition {
    /// Unique, stable name (e.g., "anf_pools_get")
    pub name: String,
    pub description: String,
    /// Argument shape; always an object at the root
    pub schema: Schema,
    pub handler: OperationHandler,
}

impl OperationDefinition {
    pub fn rest(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: impl Into<Schema>,
        binding: RestBinding,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: schema.into(),
            handler: OperationHandler::Rest(binding),
        }
    }

    pub fn stub(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: impl Into<Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: schema.into(),
            handler: OperationHandler::Stub,
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self.handler, OperationHandler::Rest(_))
    }

    pub fn binding(&self) -> Option<&RestBinding> {
        match &self.handler {
            OperationHandler::Rest(binding) => Some(binding),
            OperationHandler::Stub => None,
        }
    }

    /// GETs and stubs are read-only; every other verb changes state
    pub fn risk_level(&self) -> RiskLevel {
        match self.binding() {
            Some(binding) if binding.method != HttpMethod::Get => RiskLevel::High,
            _ => RiskLevel::Low,
        }
    }
}

/// Ordered catalog of operation descriptors
///
/// Registration order is preserved for listing; lookups go through a name
/// index. Names are unique: registering a name twice fails.
#[derive(Debug, Clone, Default)]
pub struct OperationSpec {
    operations: Vec<OperationDefinition>,
    index: HashMap<String, usize>,
}

impl OperationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, operation: OperationDefinition) -> Result<Self, DomainError> {
        if self.index.contains_key(&operation.name) {
            return Err(DomainError::DuplicateOperation(operation.name));
        }
        self.index
            .insert(operation.name.clone(), self.operations.len());
        self.operations.push(operation);
        Ok(self)
    }

    pub fn register_all(
        self,
        operations: impl IntoIterator<Item = OperationDefinition>,
    ) -> Result<Self, DomainError> {
        operations.into_iter().try_fold(self, Self::register)
    }

    pub fn get(&self, name: &str) -> Option<&OperationDefinition> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.operations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(|o| o.name.as_str())
    }

    pub fn implemented(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.operations.iter().filter(|o| o.is_implemented())
    }

    pub fn stubs(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.operations.iter().filter(|o| !o.is_implemented())
    }

    pub fn read_only(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.operations
            .iter()
            .filter(|o| o.risk_level() == RiskLevel::Low)
    }

    /// Keep only the operations for which `keep` returns true
    pub fn retain(mut self, keep: impl Fn(&OperationDefinition) -> bool) -> Self {
        self.operations.retain(|o| keep(o));
        self.index = self
            .operations
            .iter()
            .enumerate()
            .map(|(i, o)| (o.name.clone(), i))
            .collect();
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

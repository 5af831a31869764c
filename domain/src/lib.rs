//! Domain layer for anf-mcp
//!
//! This crate contains the operation model, the schema validation gate and
//! the credential rules. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Operations
//!
//! Every management action (list pools, create a volume, break replication)
//! is an [`OperationDefinition`]: a unique name, an argument [`Schema`] and a
//! handler. Handlers are data, not code: a [`RestBinding`] describes the HTTP
//! verb, path template and api-version, while `Stub` marks an operation that
//! is registered but not wired to a backend.
//!
//! ## Validation
//!
//! Raw JSON arguments pass through a [`SchemaValidator`] before anything else
//! happens. Validation reports every violated constraint at once.
//!
//! ## Credentials
//!
//! [`AccessToken`] carries a bearer token with an expiry already reduced by
//! a one-minute safety buffer.

pub mod core;
pub mod credential;
pub mod operation;
pub mod schema;

// Re-export commonly used types
pub use core::error::DomainError;
pub use credential::{AccessToken, TOKEN_SAFETY_BUFFER_SECS, TokenGrant};
pub use operation::{
    ApiErrorDetail, ApiRequest, ApiResult, BodySource, DispatchOutcome, HttpMethod,
    OperationDefinition, OperationHandler, OperationSpec, PathTemplate, QueryParam, RestBinding,
    RiskLevel,
};
pub use schema::{
    ArraySchema, DefaultSchemaValidator, Field, IntegerSchema, NumberSchema, ObjectSchema, Pattern,
    Schema, SchemaValidator, StringSchema, ValidationIssue, summarize_issues,
};

//! Schema domain module
//!
//! Declarative parameter shapes and the validation gate that every operation
//! call passes through before any credential or network activity.
//!
//! ```text
//! ┌──────────────┐    ┌────────────────────┐    ┌──────────────────────────┐
//! │ Schema       │───▶│ SchemaValidator    │───▶│ Ok(typed, defaulted)     │
//! │ (catalog)    │    │ (pure, no I/O)     │    │ Err(Vec<ValidationIssue>)│
//! └──────────────┘    └────────────────────┘    └──────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Schema`]: primitive checks (string length/pattern, numeric bounds,
//!   enums, UUIDs) composed with object/array/union combinators
//! - [`Field`]: object member, required or optional with a default
//! - [`SchemaValidator`]: trait with [`DefaultSchemaValidator`] as the
//!   standard implementation
//! - [`ValidationIssue`]: one violated constraint addressed by field path

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{
    ArraySchema, Field, IntegerSchema, NumberSchema, ObjectSchema, Pattern, Schema, StringSchema,
};
pub use traits::{DefaultSchemaValidator, SchemaValidator, is_uuid};
pub use value_objects::{ValidationIssue, summarize_issues};

//! Operation domain module
//!
//! Descriptors for the callable management operations and the shapes of the
//! requests and results they produce.
//!
//! # Key Types
//!
//! - [`OperationDefinition`]: name, description, argument [`Schema`](crate::Schema)
//!   and handler
//! - [`OperationHandler`]: `Rest(RestBinding)` for wired operations, `Stub`
//!   for ones that only return a placeholder
//! - [`OperationSpec`]: ordered catalog with unique names
//! - [`ApiResult`] / [`DispatchOutcome`]: normalized results

pub mod entities;
pub mod path;
pub mod value_objects;

pub use entities::{
    BodySource, HttpMethod, OperationDefinition, OperationHandler, OperationSpec, QueryParam,
    RestBinding, RiskLevel,
};
pub use path::PathTemplate;
pub use value_objects::{ApiErrorDetail, ApiRequest, ApiResult, DispatchOutcome};

//! Application layer for anf-mcp
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ContextDefaults;
pub use error::DispatchError;
pub use ports::{
    clock::{Clock, SystemClock},
    http_transport::{HttpRequest, HttpResponse, HttpTransportPort, TransportError},
    identity_provider::{AuthError, IdentityProviderPort},
    operation_schema::OperationSchemaPort,
};
pub use use_cases::{
    credential_manager::CredentialManager, operation_registry::OperationRegistry,
    request_dispatcher::RequestDispatcher,
};

//! Infrastructure layer for anf-mcp
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer (token endpoint, management API transport, JSON Schema
//! rendering), configuration file loading, and the declarative operation
//! catalog.

pub mod catalog;
pub mod config;
pub mod http;
pub mod identity;
pub mod schema;

// Re-export commonly used types
pub use catalog::default_operation_spec;
pub use config::{
    ClientCredentials, ConfigLoader, ConfigValidationError, FileAzureConfig, FileConfig,
    FileHttpConfig, FileServerConfig,
};
pub use http::{ReqwestTransport, build_client};
pub use identity::{ClientCredentialsProvider, UnconfiguredIdentity};
pub use schema::JsonSchemaConverter;

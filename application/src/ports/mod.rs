//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod http_transport;
pub mod identity_provider;
pub mod operation_schema;

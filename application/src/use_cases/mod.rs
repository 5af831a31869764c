//! Use cases
//!
//! Application-level operations that orchestrate domain logic:
//!
//! - [`credential_manager`]: cached, single-flight bearer tokens
//! - [`request_dispatcher`]: one authenticated REST call, classified
//! - [`operation_registry`]: name → validate → handler

pub mod credential_manager;
pub mod operation_registry;
pub mod request_dispatcher;

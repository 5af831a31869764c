//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: catalog-definition and binding errors

pub mod error;

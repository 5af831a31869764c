//! Identity provider adapters

mod client_credentials;

pub use client_credentials::{ClientCredentialsProvider, UnconfiguredIdentity};

//! Dispatch error taxonomy

use anf_domain::{DomainError, ValidationIssue, summarize_issues};
use serde_json::{Value, json};
use thiserror::Error;

use crate::ports::{http_transport::TransportError, identity_provider::AuthError};

/// Why a dispatch did not produce a result
///
/// A non-2xx answer from the management API is not an error here: it is an
/// [`ApiResult::Failure`](anf_domain::ApiResult) returned in `Ok`.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid arguments: {}", summarize_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Request binding failed: {0}")]
    Binding(#[from] DomainError),
}

impl DispatchError {
    /// Stable machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownOperation(_) => "unknown_operation",
            DispatchError::Validation(_) => "validation",
            DispatchError::Auth(_) => "auth",
            DispatchError::Network(_) => "network",
            DispatchError::Binding(_) => "binding",
        }
    }

    /// Render on the same result surface as successful dispatches
    pub fn to_result_json(&self) -> Value {
        let mut result = json!({
            "success": false,
            "errorType": self.kind(),
            "message": self.to_string(),
        });
        match self {
            DispatchError::Validation(issues) => {
                result["issues"] = json!(issues);
            }
            DispatchError::Auth(auth) => {
                if let Some(status) = auth.status() {
                    result["status"] = json!(status);
                }
            }
            _ => {}
        }
        result
    }
}

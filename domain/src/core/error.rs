//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are programming or catalog-definition errors. Caller mistakes in
/// operation arguments are reported as [`ValidationIssue`](crate::ValidationIssue)s,
/// never through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Operation '{0}' is already registered")]
    DuplicateOperation(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid path template '{template}': {message}")]
    InvalidPathTemplate { template: String, message: String },

    #[error("Path parameter '{0}' is missing from the arguments")]
    MissingPathParameter(String),

    #[error("Path parameter '{name}' must be a string or integer, got {found}")]
    InvalidPathParameter { name: String, found: String },

    #[error("Path parameter '{name}' cannot be the dot-segment '{value}'")]
    DotSegmentPathParameter { name: String, value: String },
}

impl DomainError {
    /// Whether this error is a catalog-definition problem (fatal at startup)
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateOperation(_)
                | DomainError::InvalidPattern { .. }
                | DomainError::InvalidPathTemplate { .. }
        )
    }
}

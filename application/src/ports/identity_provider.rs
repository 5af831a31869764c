//! Identity provider port
//!
//! Defines the OAuth2 client-credentials exchange that yields bearer tokens.

use anf_domain::TokenGrant;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the token exchange
///
/// `Clone` because one failed exchange is reported to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Identity provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Could not reach the identity provider: {0}")]
    Transport(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("Credentials are not configured: {0}")]
    NotConfigured(String),
}

impl AuthError {
    /// HTTP status returned by the provider, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for acquiring access tokens
///
/// Implementations perform exactly one exchange per call and never cache;
/// caching belongs to [`CredentialManager`](crate::CredentialManager).
#[async_trait]
pub trait IdentityProviderPort: Send + Sync {
    async fn request_token(&self) -> Result<TokenGrant, AuthError>;
}

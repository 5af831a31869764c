//! Credential domain module
//!
//! Bearer tokens obtained from the identity provider and the rule that
//! decides whether a cached one may still be used.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Seconds shaved off every token lifetime so a token is never sent during
/// its last minute of validity
pub const TOKEN_SAFETY_BUFFER_SECS: i64 = 60;

/// Successful response body of an OAuth2 client-credentials exchange
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A cached bearer token with its usable-until instant
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    /// `expires_at = issued_at + expires_in - 60s`
    pub fn from_grant(grant: TokenGrant, issued_at: DateTime<Utc>) -> Self {
        let usable = i64::try_from(grant.expires_in)
            .ok()
            .and_then(|secs| Duration::try_seconds(secs - TOKEN_SAFETY_BUFFER_SECS))
            .unwrap_or(Duration::MAX);
        let expires_at = issued_at
            .checked_add_signed(usable)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            secret: grant.access_token,
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn grant(expires_in: u64) -> TokenGrant {
        TokenGrant {
            access_token: "eyJ0eXAi".to_string(),
            expires_in,
        }
    }

    #[test]
    fn test_expiry_applies_safety_buffer() {
        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let token = AccessToken::from_grant(grant(3600), issued);
        assert_eq!(
            token.expires_at(),
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 59, 0).unwrap()
        );
    }

    #[test]
    fn test_lifetime_within_buffer_is_expired_on_arrival() {
        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        for expires_in in [0, 30, 60] {
            let token = AccessToken::from_grant(grant(expires_in), issued);
            assert!(!token.is_valid_at(issued), "{}", expires_in);
        }
        assert!(AccessToken::from_grant(grant(61), issued).is_valid_at(issued));
    }

    #[test]
    fn test_validity_boundary() {
        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let token = AccessToken::from_grant(grant(120), issued);
        assert!(token.is_valid_at(issued));
        assert!(token.is_valid_at(issued + Duration::seconds(59)));
        assert!(!token.is_valid_at(issued + Duration::seconds(60)));
    }

    #[test]
    fn test_short_lifetime_is_immediately_stale() {
        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let token = AccessToken::from_grant(grant(30), issued);
        assert!(!token.is_valid_at(issued));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = AccessToken::new("super-secret", Utc::now());
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("super-secret"));
        assert!(!format!("{:?}", grant(10)).contains("eyJ0eXAi"));
    }

    #[test]
    fn test_grant_deserializes_with_extra_fields() {
        let grant: TokenGrant = serde_json::from_str(
            r#"{"token_type":"Bearer","expires_in":3599,"ext_expires_in":3599,"access_token":"abc"}"#,
        )
        .unwrap();
        assert_eq!(grant.expires_in, 3599);
        assert_eq!(grant.access_token, "abc");
    }
}

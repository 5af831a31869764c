//! OAuth2 client-credentials exchange against the Microsoft identity platform
//!
//! `POST {authority}/{tenant}/oauth2/v2.0/token` with a form-encoded body.
//! One exchange per call; caching lives in the application layer.

use anf_application::ports::identity_provider::{AuthError, IdentityProviderPort};
use anf_domain::TokenGrant;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ClientCredentials;

/// Token endpoint responses sometimes carry `expires_in` as a string
#[derive(Deserialize)]
#[serde(untagged)]
enum Lifetime {
    Seconds(u64),
    Text(String),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Lifetime,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct ClientCredentialsProvider {
    client: reqwest::Client,
    token_url: String,
    credentials: ClientCredentials,
    scope: String,
}

impl ClientCredentialsProvider {
    pub fn new(
        client: reqwest::Client,
        token_url: impl Into<String>,
        credentials: ClientCredentials,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            credentials,
            scope: scope.into(),
        }
    }
}

#[async_trait]
impl IdentityProviderPort for ClientCredentialsProvider {
    async fn request_token(&self) -> Result<TokenGrant, AuthError> {
        debug!(
            "Requesting token for client {} from {}",
            self.credentials.client_id, self.token_url
        );

        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body, status.canonical_reason()),
            });
        }

        parse_grant(&body)
    }
}

fn parse_grant(body: &str) -> Result<TokenGrant, AuthError> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
    let expires_in = match response.expires_in {
        Lifetime::Seconds(secs) => secs,
        Lifetime::Text(text) => text.trim().parse().map_err(|_| {
            AuthError::InvalidResponse(format!("expires_in is not a number: {}", text))
        })?,
    };
    Ok(TokenGrant {
        access_token: response.access_token,
        expires_in,
    })
}

/// Prefer the provider's `error_description`, then its `error` code, then
/// the raw body
fn rejection_message(body: &str, reason: Option<&str>) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{}: {}", err.error, description),
            None => err.error,
        },
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => reason.unwrap_or("Unknown").to_string(),
    }
}

/// Stand-in used when no client credentials are configured
///
/// Listing and describing operations keeps working; any dispatch that needs
/// a token fails with [`AuthError::NotConfigured`].
pub struct UnconfiguredIdentity {
    reason: String,
}

impl UnconfiguredIdentity {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl IdentityProviderPort for UnconfiguredIdentity {
    async fn request_token(&self) -> Result<TokenGrant, AuthError> {
        Err(AuthError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileHttpConfig;
    use crate::http::build_client;
    use crate::http::test_server::{http_response, serve_once};

    fn credentials() -> ClientCredentials {
        ClientCredentials {
            tenant_id: "contoso".into(),
            client_id: "app-id".into(),
            client_secret: "s3cr3t".into(),
        }
    }

    fn provider(url: &str) -> ClientCredentialsProvider {
        ClientCredentialsProvider::new(
            build_client(&FileHttpConfig::default()).unwrap(),
            format!("{}/contoso/oauth2/v2.0/token", url),
            credentials(),
            "https://management.azure.com/.default",
        )
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let (url, server) = serve_once(http_response(
            "200 OK",
            r#"{"token_type":"Bearer","expires_in":3599,"access_token":"eyJ0"}"#,
        ))
        .await;

        let grant = provider(&url).request_token().await.unwrap();
        assert_eq!(grant.access_token, "eyJ0");
        assert_eq!(grant.expires_in, 3599);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /contoso/oauth2/v2.0/token HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/x-www-form-urlencoded"));
        assert!(raw.contains("grant_type=client_credentials"));
        assert!(raw.contains("client_id=app-id"));
        assert!(raw.contains("client_secret=s3cr3t"));
        assert!(raw.contains("scope=https%3A%2F%2Fmanagement.azure.com%2F.default"));
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_description() {
        let (url, _server) = serve_once(http_response(
            "401 Unauthorized",
            r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#,
        ))
        .await;

        let err = provider(&url).request_token().await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Rejected {
                status: 401,
                message: "invalid_client: AADSTS7000215: Invalid client secret provided.".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{}", addr))
            .request_token()
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }

    #[test]
    fn test_parse_grant_accepts_string_lifetime() {
        let grant = parse_grant(r#"{"access_token":"a","expires_in":"3600"}"#).unwrap();
        assert_eq!(grant.expires_in, 3600);
        assert!(matches!(
            parse_grant(r#"{"access_token":"a"}"#),
            Err(AuthError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_rejection_message_fallbacks() {
        assert_eq!(rejection_message(r#"{"error":"invalid_scope"}"#, None), "invalid_scope");
        assert_eq!(rejection_message("upstream down", None), "upstream down");
        assert_eq!(rejection_message("", Some("Bad Gateway")), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_unconfigured_identity() {
        let err = UnconfiguredIdentity::new("azure.tenant_id is not set")
            .request_token()
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotConfigured(_)));
    }
}

//! Request Dispatcher use case
//!
//! Turns a resolved [`ApiRequest`] into one authenticated HTTP call and
//! classifies the response. A single attempt per call: no retry, no backoff
//! and no timeout of its own (the transport may be configured with one).

use std::sync::Arc;

use anf_domain::{ApiRequest, ApiResult, HttpMethod};
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::credential_manager::CredentialManager;
use crate::error::DispatchError;
use crate::ports::http_transport::{HttpRequest, HttpTransportPort, TransportError};

const APPLICATION_JSON: &str = "application/json";

pub struct RequestDispatcher {
    credentials: Arc<CredentialManager>,
    transport: Arc<dyn HttpTransportPort>,
    base_url: String,
}

impl RequestDispatcher {
    pub fn new(
        credentials: Arc<CredentialManager>,
        transport: Arc<dyn HttpTransportPort>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            credentials,
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResult, DispatchError> {
        self.execute(request.method, &request.path, request.body.as_ref())
            .await
    }

    /// Execute `method path` against the management API
    ///
    /// `body` is serialized and attached only for POST, PUT and PATCH.
    /// Non-2xx responses are returned as [`ApiResult::Failure`], not as
    /// errors; `Err` means no usable response was obtained at all.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResult, DispatchError> {
        let token = self.credentials.get_token().await?;

        let body = match body {
            Some(value) if method.carries_body() => Some(
                serde_json::to_string(value)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?,
            ),
            Some(_) => {
                debug!("Dropping body for {} request", method);
                None
            }
            None => None,
        };

        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", token)),
                ("Content-Type".to_string(), APPLICATION_JSON.to_string()),
                ("Accept".to_string(), APPLICATION_JSON.to_string()),
            ],
            body,
        };
        trace!("{} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        let result = ApiResult::from_response(response.status, response.status_text, response.body);

        if let Some(status) = result.status() {
            warn!("{} {} returned {}", method, path, status);
            if status == 401 {
                // Next dispatch re-authenticates; this one is not retried
                self.credentials.invalidate();
            }
        }
        Ok(result)
    }
}

//! Management API transport

use std::time::Duration;

use anf_application::ports::http_transport::{
    HttpRequest, HttpResponse, HttpTransportPort, TransportError,
};
use anf_domain::HttpMethod;
use async_trait::async_trait;
use tracing::debug;

use crate::config::FileHttpConfig;

/// Build the shared HTTP client from `[http]` settings
///
/// No timeout is set unless one is configured.
pub fn build_client(config: &FileHttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// [`HttpTransportPort`] over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

pub(crate) fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Post => reqwest::Method::POST,
    }
}

pub(crate) fn classify_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Connection(e.to_string())
    }
}

#[async_trait]
impl HttpTransportPort for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify_error(&e))?;
        let status = response.status();
        debug!("{} {} -> {}", request.method, request.url, status.as_u16());

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::{http_response, serve_once};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(build_client(&FileHttpConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_sends_method_headers_and_body() {
        let (url, server) = serve_once(http_response("201 Created", r#"{"name":"pool1"}"#)).await;

        let response = transport()
            .send(HttpRequest {
                method: HttpMethod::Put,
                url: format!("{}/pools/pool1?api-version=2024-03-01", url),
                headers: vec![
                    ("Authorization".into(), "Bearer abc".into()),
                    ("Content-Type".into(), "application/json".into()),
                ],
                body: Some(r#"{"location":"eastus"}"#.into()),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.status_text, "Created");
        assert_eq!(response.body, r#"{"name":"pool1"}"#);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("PUT /pools/pool1?api-version=2024-03-01 HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer abc"));
        assert!(raw.to_ascii_lowercase().contains("user-agent: anf-mcp/"));
        assert!(raw.ends_with(r#"{"location":"eastus"}"#));
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let body = r#"{"error":{"code":"ResourceNotFound"}}"#;
        let (url, _server) = serve_once(http_response("404 Not Found", body)).await;

        let response = transport()
            .send(HttpRequest {
                method: HttpMethod::Get,
                url,
                headers: vec![],
                body: None,
            })
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Not Found");
        assert_eq!(response.body, body);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport()
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: format!("http://{}/", addr),
                headers: vec![],
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)));
    }

    #[test]
    fn test_zero_config_has_no_timeout() {
        assert!(build_client(&FileHttpConfig::default()).is_ok());
        let config = FileHttpConfig {
            timeout_seconds: Some(5),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }
}

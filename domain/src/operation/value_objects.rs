//! Operation value objects: the request sent and the result returned

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::entities::HttpMethod;

/// One fully resolved management API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path plus query, including the literal `api-version`
    pub path: String,
    /// Present only for POST, PUT and PATCH
    pub body: Option<Value>,
}

/// Details of a non-2xx management API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetail {
    pub status: u16,
    pub status_text: String,
    /// Raw response text, verbatim even when it is not JSON
    pub body: String,
}

/// Normalized outcome of a management API call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    Success { data: Value },
    Failure { error: ApiErrorDetail },
}

impl ApiResult {
    /// Classify a raw HTTP response
    ///
    /// - `204` is success with `data: null`
    /// - other 2xx parse the body as JSON; an empty body is `null` and a
    ///   body that is not JSON is kept as a string
    /// - everything else is a failure carrying the body verbatim
    pub fn from_response(status: u16, status_text: impl Into<String>, body: String) -> Self {
        match status {
            204 => ApiResult::Success { data: Value::Null },
            200..=299 => {
                let data = if body.trim().is_empty() {
                    Value::Null
                } else {
                    serde_json::from_str(&body).unwrap_or(Value::String(body))
                };
                ApiResult::Success { data }
            }
            _ => ApiResult::Failure {
                error: ApiErrorDetail {
                    status,
                    status_text: status_text.into(),
                    body,
                },
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiResult::Success { .. } => None,
            ApiResult::Failure { error } => Some(error.status),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiResult::Success { data } => json!({ "success": true, "data": data }),
            ApiResult::Failure { error } => json!({ "success": false, "error": error }),
        }
    }
}

/// What a dispatch produced
///
/// The two shapes are told apart by the `placeholder` flag on the JSON
/// surface: a stub never looks like a remote rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Api(ApiResult),
    Placeholder { operation: String },
}

impl DispatchOutcome {
    pub fn placeholder(operation: impl Into<String>) -> Self {
        DispatchOutcome::Placeholder {
            operation: operation.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DispatchOutcome::Placeholder { .. })
    }

    pub fn is_success(&self) -> bool {
        match self {
            DispatchOutcome::Api(result) => result.is_success(),
            DispatchOutcome::Placeholder { .. } => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            DispatchOutcome::Api(result) => result.to_json(),
            DispatchOutcome::Placeholder { operation } => json!({
                "success": false,
                "message": format!("{} is not yet implemented", operation),
                "placeholder": true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_content_is_null_data() {
        let result = ApiResult::from_response(204, "No Content", String::new());
        assert_eq!(result.to_json(), json!({"success": true, "data": null}));
    }

    #[test]
    fn test_success_parses_json() {
        let body = r#"{"name":"pool1","provisioningState":"Succeeded"}"#.to_string();
        let result = ApiResult::from_response(201, "Created", body);
        assert_eq!(
            result.to_json(),
            json!({"success": true, "data": {"name": "pool1", "provisioningState": "Succeeded"}})
        );
    }

    #[test]
    fn test_success_with_empty_or_text_body() {
        assert_eq!(
            ApiResult::from_response(202, "Accepted", "  ".into()),
            ApiResult::Success { data: Value::Null }
        );
        assert_eq!(
            ApiResult::from_response(200, "OK", "done".into()),
            ApiResult::Success { data: json!("done") }
        );
    }

    #[test]
    fn test_failure_keeps_body_verbatim() {
        let body = "<html>Resource not found</html>".to_string();
        let result = ApiResult::from_response(404, "Not Found", body.clone());
        assert_eq!(result.status(), Some(404));
        assert_eq!(
            result.to_json(),
            json!({"success": false, "error": {"status": 404, "statusText": "Not Found", "body": body}})
        );
    }

    #[test]
    fn test_placeholder_shape() {
        let outcome = DispatchOutcome::placeholder("anf_cost_analysis");
        assert!(outcome.is_placeholder());
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.to_json(),
            json!({
                "success": false,
                "message": "anf_cost_analysis is not yet implemented",
                "placeholder": true,
            })
        );

        let failure = DispatchOutcome::Api(ApiResult::from_response(500, "Internal Server Error", "x".into()));
        assert!(failure.to_json().get("placeholder").is_none());
    }
}

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AyahError;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
///
/// Rendered as `{"error": <code>, "message": <text>}`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code, code and message.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<AyahError> for HTTPError {
    fn from(err: AyahError) -> Self {
        HTTPError::new(err.status(), err.code(), err.to_string())
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));
        (
            self.status,
            [(header::CACHE_CONTROL, "no-store")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;

    #[tokio::test]
    async fn error_body_is_escaped_json() {
        let err = HTTPError::from(AyahError::from(UpstreamError::Status {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"message": "bad "quotes""}"#.to_string(),
        }));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "upstream_failed");
        assert!(body["message"].as_str().unwrap().contains("bad \"quotes\""));
    }
}

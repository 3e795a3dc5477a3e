//! Random verse endpoint.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::models::AyahPayload;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers the random-ayah route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/random-ayah", get(random_ayah))
}

/// Returns one random verse exactly as the content API produced it.
///
/// Token and upstream failures become 502/504 with a JSON error body.
async fn random_ayah(State(state): State<AppState>) -> Result<Json<AyahPayload>, HTTPError> {
    let span = info_span!("random_ayah", request_id = %Uuid::new_v4());

    async move {
        match state.ayahs.random_ayah().await {
            Ok(ayah) => {
                info!(
                    event_name = "content.random_verse.served",
                    event_domain = "content",
                    verse_key = ayah.verse_key().unwrap_or("unknown"),
                    "served random ayah"
                );
                Ok(Json(ayah))
            }
            Err(e) => {
                error!(
                    event_name = "content.random_verse.error",
                    event_domain = "content",
                    code = e.code(),
                    "Failed to fetch random ayah: {}",
                    e
                );
                Err(e.into())
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::AyahSource;
    use crate::error::{AuthError, AyahError, UpstreamError};
    use crate::routes::tests::{body_json, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    enum Outcome {
        Ok(serde_json::Value),
        AuthFails,
        Timeout,
    }

    struct StubSource(Outcome);

    #[async_trait::async_trait]
    impl AyahSource for StubSource {
        async fn random_ayah(&self) -> Result<AyahPayload, AyahError> {
            match &self.0 {
                Outcome::Ok(v) => Ok(AyahPayload(v.clone())),
                Outcome::AuthFails => Err(AuthError::InvalidResponse("no token".into()).into()),
                Outcome::Timeout => Err(UpstreamError::Timeout.into()),
            }
        }
    }

    async fn call(outcome: Outcome) -> axum::response::Response {
        let app = crate::routes::create_router(test_state(Arc::new(StubSource(outcome))));
        app.oneshot(
            Request::builder()
                .uri("/api/random-ayah")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn payload_is_returned_unchanged() {
        let payload = json!({"verse": {"verse_key": "1:1", "text_uthmani": "X", "nested": {"a": [1, null]}}});

        let response = call(Outcome::Ok(payload.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        assert_eq!(body_json(response).await, payload);
    }

    #[tokio::test]
    async fn auth_failure_is_bad_gateway() {
        let response = call(Outcome::AuthFails).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "auth_failed");
    }

    #[tokio::test]
    async fn upstream_timeout_is_gateway_timeout() {
        let response = call(Outcome::Timeout).await;

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response).await["error"], "upstream_timeout");
    }
}

//! Platform fulfillment endpoint
//!
//! Receives `{requestId, inputs:[{intent, payload}]}` and answers with the
//! handler's response envelope.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;

use super::ApiState;
use crate::Error;
use crate::intents::{ErrorCode, IntentRequest, PlatformRequest};

/// Error body for requests the bridge cannot decode
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Answer for intents the bridge does not implement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedIntentResponse {
    pub request_id: String,
    pub payload: UnsupportedIntentPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedIntentPayload {
    pub error_code: ErrorCode,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Handle one platform intent
pub async fn handle_intent(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PlatformRequest>,
) -> Response {
    let intent = match IntentRequest::try_from(request) {
        Ok(intent) => intent,
        Err(Error::UnsupportedIntent { request_id, intent }) => {
            tracing::warn!(%request_id, %intent, "unsupported intent");
            return Json(UnsupportedIntentResponse {
                request_id,
                payload: UnsupportedIntentPayload {
                    error_code: ErrorCode::IntentNotSupported,
                },
            })
            .into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed intent");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let pending = state.handler.handle(&intent);
    let response = match state.handler_timeout {
        Some(deadline) => match tokio::time::timeout(deadline, pending).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(
                    request_id = %intent.request_id(),
                    intent = intent.intent(),
                    ?deadline,
                    "intent deadline exceeded"
                );
                return error_response(StatusCode::GATEWAY_TIMEOUT, "intent deadline exceeded");
            }
        },
        None => pending.await,
    };

    Json(response).into_response()
}

/// Build fulfillment router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/fulfillment", post(handle_intent))
        .with_state(state)
}

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    error::CreateError,
    models::AlertThreshold,
    services::alerts_service,
    AppState,
};

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "status": "error", "message": message.into() })),
    )
        .into_response()
}

// POST /create
//
// The body is read as raw bytes so a missing or odd content type is treated
// like any other malformed body.
pub async fn post_create_alert(State(state): State<AppState>, body: Bytes) -> Response {
    let threshold: AlertThreshold = match serde_json::from_slice(&body) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting create body");
            return error_json(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    match alerts_service::create_threshold(state.store.as_ref(), threshold).await {
        Ok(_id) => (
            StatusCode::CREATED,
            Json(json!({
                "status": "success",
                "message": "Configuration saved successfully",
            })),
        )
            .into_response(),
        Err(CreateError::Invalid(e)) => {
            tracing::info!(error = %e, "threshold rejected");
            error_json(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(CreateError::Store(e)) => {
            tracing::error!(error = %e, "error creating threshold");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save configuration")
        }
    }
}

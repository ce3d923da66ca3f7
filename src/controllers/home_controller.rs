use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{models::sentiment_label, AppState};

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn health_db(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "store: ok".to_string()).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("store error: {}", e),
        )
            .into_response(),
    }
}

// GET /sentiment
pub async fn get_sentiment(State(state): State<AppState>) -> Response {
    match state.quotes.get_sentiment().await {
        Ok(index) => (
            StatusCode::OK,
            Json(json!({
                "value": index.value,
                "classification": index.classification,
                "label": sentiment_label(index.value),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error fetching sentiment index");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "sentiment index unavailable" })),
            )
                .into_response()
        }
    }
}

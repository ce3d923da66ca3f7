use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub alerts_triggered: usize,
}

// GET /scan
pub async fn get_scan(State(state): State<AppState>) -> Response {
    match state.scanner.run_scan().await {
        Ok(alerts) => (
            StatusCode::OK,
            Json(ScanResponse {
                alerts_triggered: alerts.len(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "alert scan failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to execute alert scan").into_response()
        }
    }
}

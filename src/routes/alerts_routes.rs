use axum::{Router, routing::post};
use crate::{AppState, controllers::alerts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/create", post(alerts_controller::post_create_alert))
        .route("/crypto_alert_api/create", post(alerts_controller::post_create_alert))
}

use axum::{Router, routing::get};
use crate::{AppState, controllers::scan_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/scan", get(scan_controller::get_scan))
        .route("/crypto_alert_api/execute", get(scan_controller::get_scan))
}

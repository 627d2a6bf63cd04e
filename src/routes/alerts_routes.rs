use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{controllers::alerts_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/add-alert", post(alerts_controller::post_add_alert))
        .route("/alerts", post(alerts_controller::post_list_alerts))
        .route("/alerts/:id", delete(alerts_controller::delete_alert))
        .route("/check-alerts", get(alerts_controller::get_check_alerts))
}

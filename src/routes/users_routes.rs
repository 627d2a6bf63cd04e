use axum::{
    routing::{get, post},
    Router,
};

use crate::{controllers::users_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/register", post(users_controller::post_register))
        .route("/users", get(users_controller::get_users))
}

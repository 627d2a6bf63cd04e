use axum::{routing::get, Router};

use crate::{controllers::home_controller, AppState};

pub mod alerts_routes;
pub mod users_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = alerts_routes::add_routes(router);
    let router = users_routes::add_routes(router);

    router
        .route("/health", get(home_controller::health))
        .with_state(state)
}

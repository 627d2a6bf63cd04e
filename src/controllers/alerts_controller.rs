use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::models::alert::normalize_handle;
use crate::models::{Alert, Condition};
use crate::AppState;

fn bad_request(msg: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg.into() }))).into_response()
}

fn store_error(e: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("store error: {e}") })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct AddAlertRequest {
    pub symbol: Option<String>,
    pub condition: Option<String>,
    pub price: Option<f64>,
    pub username: Option<String>,
}

// POST /add-alert
pub async fn post_add_alert(
    State(state): State<AppState>,
    Json(req): Json<AddAlertRequest>,
) -> Response {
    let (Some(symbol), Some(condition), Some(price), Some(username)) =
        (req.symbol, req.condition, req.price, req.username)
    else {
        return bad_request("Missing required fields.");
    };

    let condition = match Condition::from_str(&condition) {
        Ok(c) => c,
        Err(e) => return bad_request(e.to_string()),
    };

    let alert = match Alert::new(
        &symbol,
        condition,
        price,
        &username,
        &state.settings.exchange_suffix,
    ) {
        Ok(a) => a,
        Err(e) => return bad_request(e.to_string()),
    };

    if let Err(e) = state.store.append(alert.clone()).await {
        return store_error(e);
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Alert saved", "alert": alert })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct OwnerRequest {
    pub username: Option<String>,
}

// POST /alerts
pub async fn post_list_alerts(
    State(state): State<AppState>,
    Json(req): Json<OwnerRequest>,
) -> Response {
    let Some(owner) = req.username.as_deref().and_then(normalize_handle) else {
        return bad_request("Missing 'username' in request body.");
    };

    let alerts = match state.store.load_all().await {
        Ok(v) => v,
        Err(e) => return store_error(e),
    };

    let mine: Vec<Alert> = alerts.into_iter().filter(|a| a.owner == owner).collect();
    (StatusCode::OK, Json(mine)).into_response()
}

// DELETE /alerts/:id
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OwnerRequest>,
) -> Response {
    let Some(owner) = req.username.as_deref().and_then(normalize_handle) else {
        return bad_request("Missing 'username' in request body.");
    };

    let alerts = match state.store.load_all().await {
        Ok(v) => v,
        Err(e) => return store_error(e),
    };

    // Owner check before removal; deleting someone else's alert looks the
    // same as deleting a nonexistent one.
    let owned = alerts.iter().any(|a| a.id == id && a.owner == owner);
    if !owned {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Alert not found." })),
        )
            .into_response();
    }

    match state.store.remove_by_id(&id).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "message": "Alert deleted" }))).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Alert not found." })),
        )
            .into_response(),
        Err(e) => store_error(e),
    }
}

#[derive(Deserialize)]
pub struct CheckAlertsQuery {
    pub username: Option<String>,
}

// GET /check-alerts?username=@bob
pub async fn get_check_alerts(
    State(state): State<AppState>,
    Query(q): Query<CheckAlertsQuery>,
) -> Response {
    let owner = q.username.as_deref().and_then(normalize_handle);

    match state.engine.run_cycle(owner.as_deref()).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({ "triggered": report.triggered })),
        )
            .into_response(),
        Err(e) => store_error(e),
    }
}

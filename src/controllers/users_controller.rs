use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::DirectoryError;
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
}

// POST /register
pub async fn post_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let Some(username) = req.username else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing 'username' in request body." })),
        )
            .into_response();
    };

    match state.directory.register(&username).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User registered successfully" })),
        )
            .into_response(),
        Err(DirectoryError::AlreadyRegistered) => (
            StatusCode::OK,
            Json(json!({ "message": "User already exists" })),
        )
            .into_response(),
        Err(DirectoryError::InvalidHandle(h)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("invalid handle: {h}") })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("store error: {e}") })),
        )
            .into_response(),
    }
}

// GET /users
pub async fn get_users(State(state): State<AppState>) -> Response {
    let users = state.directory.list().await;
    (StatusCode::OK, Json(users)).into_response()
}

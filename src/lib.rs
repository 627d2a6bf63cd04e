//! Library entrypoint for stockwatch.
//!
//! This file exists mainly to make controller and engine tests easy
//! (integration tests under `tests/` can import the app state, routers,
//! services, and wire in fake collaborators).

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub mod controllers;
pub mod routes;

use services::alert_store::AlertStore;
use services::directory::UserDirectory;
use services::engine::Engine;

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub store: Arc<dyn AlertStore>,
    pub directory: Arc<UserDirectory>,
    pub engine: Arc<Engine>,
}

//! Worldsmith - bulk-aware CRUD services for worlds, areas and characters

pub mod bulk;
pub mod controllers;
pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod store;
pub mod transport;

pub use core::{AppError, AppState, config};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use transport::*;

    Router::new()
        .route("/", get(root))
        .route("/rpc", get(list_patterns))
        .route("/rpc/{pattern}", post(rpc))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

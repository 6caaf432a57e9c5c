//! Route table

use super::handlers;
use super::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/transactions", post(handlers::post_transaction))
        .route("/statistics", get(handlers::get_statistics));

    Router::new().nest("/api", api_routes).with_state(state)
}

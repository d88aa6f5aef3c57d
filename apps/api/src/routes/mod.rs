pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::letter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Letters API
        .route(
            "/api/v1/letters/canonical",
            post(handlers::handle_canonical),
        )
        .route("/api/v1/letters/preview", post(handlers::handle_preview))
        .route(
            "/api/v1/letters/export/:format",
            post(handlers::handle_export),
        )
        .with_state(state)
}

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template API
        .route(
            "/api/v1/templates/:id",
            get(handlers::handle_get_template).put(handlers::handle_put_template),
        )
        // Layout API
        .route("/api/v1/layout", post(handlers::handle_layout))
        .with_state(state)
}

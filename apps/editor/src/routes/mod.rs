pub mod documents;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Document API: stateless, the document travels with every request
        .route(
            "/api/v1/documents/validate",
            post(documents::handle_validate),
        )
        .route("/api/v1/documents/render", post(documents::handle_render))
        .route("/api/v1/documents/export", post(documents::handle_export))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

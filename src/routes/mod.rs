//! Route definitions for the AgriBridge dashboard API

mod dashboard;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{health_check, root};
use crate::state::AppState;

pub use dashboard::dashboard_routes;

/// Full application router with shared state applied. CORS is left to the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(dashboard_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

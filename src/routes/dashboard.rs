use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/sections/:section", get(get_section))
        .route(
            "/api/dashboard/sections/:section/refresh",
            post(refresh_section),
        )
        .route("/api/dashboard/notifications", post(send_notification))
        .route(
            "/api/dashboard/blockchain/transactions",
            post(create_blockchain_transaction),
        )
}

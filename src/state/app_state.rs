//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::dashboard::Dashboard;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self { dashboard }
    }
}

impl FromRef<AppState> for Arc<Dashboard> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dashboard.clone()
    }
}

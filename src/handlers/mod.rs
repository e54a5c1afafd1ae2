//! API handlers for the AgriBridge dashboard

pub mod dashboard;

pub use dashboard::{
    create_blockchain_transaction, get_dashboard, get_section, refresh_section, send_notification,
};

pub async fn root() -> &'static str {
    "AgriBridge Dashboard API"
}

pub async fn health_check() -> &'static str {
    "OK"
}

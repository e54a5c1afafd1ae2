//! AgriBridge Dashboard Library
//!
//! Dashboard core for the AgriBridge platform: six independently loaded
//! sections (ESG report, products, orders, ledger, IoT telemetry, mock
//! blockchain), a guarded LINE push action and the blockchain
//! create-then-refresh workflow, plus the gateways and HTTP surface around it.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;

pub use dashboard::Dashboard;
pub use error::{DashboardError, GatewayError};

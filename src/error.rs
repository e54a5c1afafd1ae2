//! Error types for the dashboard core and its resource gateways

use thiserror::Error;

/// Failure reported by a resource gateway call.
///
/// All three variants are section-scoped: the orchestrator turns any of them
/// into a `Failed` slot for the section that issued the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Malformed(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Malformed(err.to_string())
    }
}

/// Errors surfaced by the dashboard's user-triggered actions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("請輸入有效的 LINE 用戶ID。")]
    InvalidRecipient,

    #[error("Invalid transaction draft: {0}")]
    InvalidDraft(String),

    #[error("Session is not authenticated")]
    Unauthenticated,

    #[error("Dashboard is not active")]
    Inactive,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::dashboard::{Dashboard, DashboardSnapshot, Section, SectionView};
use crate::error::DashboardError;
use crate::models::{ApiResponse, ChainTxn, ChainTxnDraft, NotificationAck, NotificationForm};

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn error_status(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::InvalidRecipient | DashboardError::InvalidDraft(_) => StatusCode::BAD_REQUEST,
        DashboardError::Unauthenticated => StatusCode::UNAUTHORIZED,
        DashboardError::Inactive => StatusCode::CONFLICT,
        DashboardError::Gateway(_) => StatusCode::BAD_GATEWAY,
    }
}

fn failure<T>(err: DashboardError) -> Reply<T> {
    (error_status(&err), Json(ApiResponse::err(err.to_string())))
}

fn parse_section<T>(name: &str) -> Result<Section, Reply<T>> {
    name.parse::<Section>()
        .map_err(|e| (StatusCode::NOT_FOUND, Json(ApiResponse::err(e.to_string()))))
}

pub async fn get_dashboard(State(dashboard): State<Arc<Dashboard>>) -> Reply<DashboardSnapshot> {
    (StatusCode::OK, Json(ApiResponse::ok(dashboard.snapshot())))
}

pub async fn get_section(
    State(dashboard): State<Arc<Dashboard>>,
    Path(name): Path<String>,
) -> Reply<SectionView> {
    match parse_section(&name) {
        Ok(section) => (StatusCode::OK, Json(ApiResponse::ok(dashboard.view(section)))),
        Err(reply) => reply,
    }
}

pub async fn refresh_section(
    State(dashboard): State<Arc<Dashboard>>,
    Path(name): Path<String>,
) -> Reply<SectionView> {
    let section = match parse_section(&name) {
        Ok(section) => section,
        Err(reply) => return reply,
    };

    match dashboard.refresh_section(section) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(ApiResponse::ok(dashboard.view(section))),
        ),
        Err(e) => failure(e),
    }
}

pub async fn send_notification(
    State(dashboard): State<Arc<Dashboard>>,
    Json(form): Json<NotificationForm>,
) -> Reply<NotificationAck> {
    match dashboard.submit_notification(&form.user_id).await {
        Ok(ack) => (StatusCode::OK, Json(ApiResponse::ok(ack))),
        Err(e) => failure(e),
    }
}

/// An empty body falls back to a generated demo draft; any other body must
/// be a well-formed draft.
pub async fn create_blockchain_transaction(
    State(dashboard): State<Arc<Dashboard>>,
    body: Bytes,
) -> Reply<ChainTxn> {
    let draft = match parse_draft(&body) {
        Ok(draft) => draft,
        Err(e) => return failure(e),
    };

    match dashboard.create_blockchain_transaction(draft).await {
        Ok(record) => (StatusCode::CREATED, Json(ApiResponse::ok(record))),
        Err(e) => failure(e),
    }
}

fn parse_draft(body: &[u8]) -> Result<ChainTxnDraft, DashboardError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChainTxnDraft::demo());
    }

    serde_json::from_slice(body).map_err(|e| DashboardError::InvalidDraft(e.to_string()))
}

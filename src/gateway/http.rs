//! reqwest transport against the AgriBridge REST API (`/api/v1`).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::ResourceGateway;
use crate::error::GatewayError;
use crate::models::wire::{
    self, BlockchainTxnWire, ErrorDetailWire, EsgReportWire, IoTDataWire, OrderWire, PaymentWire,
    ProductWire,
};
use crate::models::{
    AccessToken, ChainTxn, ChainTxnDraft, FarmerReport, IoTSample, LedgerTxn, NotificationAck,
    NotificationRequest, Order, Product,
};
use crate::session::SessionProvider;

const MAX_DETAIL_CHARS: usize = 200;

/// HTTP gateway; every request carries the session's bearer token when one
/// is present.
pub struct HttpGateway {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange username/password for an access token. The caller decides
    /// whether to store it in a session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, GatewayError> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        read_json(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.current_credential() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let response = self
            .authorize(self.http.get(self.url(path)).query(query))
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            detail: error_detail(&body, status.canonical_reason()),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull the `detail` out of a FastAPI error body, falling back to the raw body.
fn error_detail(body: &str, reason: Option<&str>) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorDetailWire>(body) {
        return match err.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        };
    }

    let body = body.trim();
    if body.is_empty() {
        return reason.unwrap_or("request failed").to_string();
    }
    body.chars().take(MAX_DETAIL_CHARS).collect()
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn fetch_farmer_report(&self, farmer_id: i64) -> Result<FarmerReport, GatewayError> {
        let report: EsgReportWire = self
            .get_json(&format!("/farmers/{}/esg-report", farmer_id), &[])
            .await?;
        Ok(report.into())
    }

    async fn fetch_products(&self, limit: u32, offset: u32) -> Result<Vec<Product>, GatewayError> {
        let products: Vec<ProductWire> = self
            .get_json(
                "/products",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(products.into_iter().map(Product::from).collect())
    }

    async fn fetch_orders(&self, limit: u32, offset: u32) -> Result<Vec<Order>, GatewayError> {
        let orders: Vec<OrderWire> = self
            .get_json(
                "/orders",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(orders.into_iter().map(Order::from).collect())
    }

    async fn fetch_ledger_transactions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<LedgerTxn>, GatewayError> {
        let txns: Vec<PaymentWire> = self
            .get_json(
                "/ledger/transactions",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(txns.into_iter().map(LedgerTxn::from).collect())
    }

    async fn fetch_iot_data(
        &self,
        device_id: &str,
        limit: u32,
    ) -> Result<Vec<IoTSample>, GatewayError> {
        let samples: Vec<IoTDataWire> = self
            .get_json(
                &format!("/iot/data/{}", device_id),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(wire::normalize_iot(samples))
    }

    async fn fetch_blockchain_transactions(
        &self,
        limit: u32,
    ) -> Result<Vec<ChainTxn>, GatewayError> {
        let records: Vec<BlockchainTxnWire> = self
            .get_json("/blockchain/transactions", &[("limit", limit.to_string())])
            .await?;
        wire::normalize_chain(records)
    }

    async fn create_blockchain_transaction(
        &self,
        draft: &ChainTxnDraft,
    ) -> Result<ChainTxn, GatewayError> {
        let response = self
            .authorize(self.http.post(self.url("/blockchain/transactions")).json(draft))
            .send()
            .await?;

        let record: BlockchainTxnWire = read_json(response).await?;
        ChainTxn::try_from(record)
    }

    async fn send_notification(
        &self,
        recipient_id: &str,
        message: &str,
    ) -> Result<NotificationAck, GatewayError> {
        let request = NotificationRequest {
            user_id: recipient_id.to_string(),
            message: message.to_string(),
        };

        let response = self
            .authorize(
                self.http
                    .post(self.url("/notifications/send-line-message"))
                    .json(&request),
            )
            .send()
            .await?;

        read_json(response).await
    }
}

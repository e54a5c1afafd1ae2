//! Resource gateways: one async operation per backend resource.
//!
//! Gateways carry no business logic. They return normalized records or a
//! [`GatewayError`], and the dashboard decides what that means for a section.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::{
    ChainTxn, ChainTxnDraft, FarmerReport, IoTSample, LedgerTxn, NotificationAck, Order, Product,
};

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::MemoryGateway;

#[async_trait]
pub trait ResourceGateway: Send + Sync {
    async fn fetch_farmer_report(&self, farmer_id: i64) -> Result<FarmerReport, GatewayError>;

    async fn fetch_products(&self, limit: u32, offset: u32) -> Result<Vec<Product>, GatewayError>;

    async fn fetch_orders(&self, limit: u32, offset: u32) -> Result<Vec<Order>, GatewayError>;

    async fn fetch_ledger_transactions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<LedgerTxn>, GatewayError>;

    async fn fetch_iot_data(&self, device_id: &str, limit: u32)
        -> Result<Vec<IoTSample>, GatewayError>;

    async fn fetch_blockchain_transactions(&self, limit: u32)
        -> Result<Vec<ChainTxn>, GatewayError>;

    async fn create_blockchain_transaction(
        &self,
        draft: &ChainTxnDraft,
    ) -> Result<ChainTxn, GatewayError>;

    async fn send_notification(
        &self,
        recipient_id: &str,
        message: &str,
    ) -> Result<NotificationAck, GatewayError>;
}

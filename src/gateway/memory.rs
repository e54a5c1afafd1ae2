//! In-process demo backend.
//!
//! Mirrors the mock behavior of the AgriBridge API so the dashboard can run
//! without a server: seeded products and orders, a generated ledger, a
//! synthetic IoT history and an append-only mock chain.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ResourceGateway;
use crate::error::GatewayError;
use crate::models::{
    ChainTxn, ChainTxnDraft, EnvironmentalImpact, FarmerReport, IoTSample, LedgerTxn,
    NotificationAck, NotificationRequest, Order, Product, SocialImpact,
};

const DEMO_TENANT_ID: i64 = 1;
const DEMO_FARMER_ID: i64 = 1;
const DEMO_FARMER_NAME: &str = "AgriBridge Demo Farm";
const IOT_HISTORY_POINTS: i64 = 20;
const IOT_INTERVAL_MINUTES: i64 = 5;

/// In-memory mock of every backend resource the dashboard reads.
pub struct MemoryGateway {
    placeholder_user_id: String,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    products: Vec<Product>,
    orders: Vec<Order>,
    chain: Vec<ChainTxn>,
    iot: HashMap<String, Vec<IoTSample>>,
    outbox: Vec<NotificationRequest>,
}

impl MemoryGateway {
    /// Empty backend: no products, orders or chain records.
    pub fn new(placeholder_user_id: impl Into<String>) -> Self {
        Self {
            placeholder_user_id: placeholder_user_id.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Backend seeded with the default tenant's catalogue and orders.
    pub fn seeded(placeholder_user_id: impl Into<String>) -> Self {
        let products = vec![
            demo_product(101, "有機蔬菜包", 120.0),
            demo_product(102, "高山水果禮盒", 500.0),
            demo_product(103, "新鮮雞蛋 (10入)", 80.0),
        ];
        let orders = vec![
            demo_order(1, &products[0], 2, 101, "completed"),
            demo_order(2, &products[1], 1, 102, "pending"),
        ];

        Self {
            placeholder_user_id: placeholder_user_id.into(),
            state: Mutex::new(MemoryState {
                products,
                orders,
                ..MemoryState::default()
            }),
        }
    }

    /// Notifications accepted so far, oldest first.
    pub async fn sent_notifications(&self) -> Vec<NotificationRequest> {
        self.state.lock().await.outbox.clone()
    }
}

fn demo_product(id: i64, name: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        farmer_id: DEMO_FARMER_ID,
        tenant_id: DEMO_TENANT_ID,
    }
}

fn demo_order(id: i64, product: &Product, quantity: u32, buyer_id: i64, status: &str) -> Order {
    Order {
        id,
        product_id: product.id,
        quantity,
        total_price: product.price * f64::from(quantity),
        buyer_id,
        status: status.to_string(),
        tenant_id: DEMO_TENANT_ID,
    }
}

fn page<T: Clone>(items: &[T], limit: u32, offset: u32) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// ESG score derived from sales: fair trade and carbon reduction scale with
/// volume, diversity of products sold adds a flat bonus.
fn esg_report(farmer_name: &str, orders: &[Order]) -> FarmerReport {
    if orders.is_empty() {
        return FarmerReport {
            farmer_name: farmer_name.to_string(),
            esg_score: 0.0,
            social_impact: SocialImpact {
                fair_trade_index: 0.0,
                community_engagement: "None".to_string(),
            },
            environmental_impact: EnvironmentalImpact {
                carbon_reduction_tons: 0.0,
                water_efficiency: "None".to_string(),
            },
        };
    }

    let total_sales: f64 = orders.iter().map(|o| f64::from(o.quantity)).sum();
    let mut product_ids: Vec<i64> = orders.iter().map(|o| o.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let unique_products = product_ids.len();

    let fair_trade_index = (total_sales * 0.005).min(0.95);
    let community_engagement = match unique_products {
        n if n > 3 => "High",
        n if n > 1 => "Moderate",
        _ => "Low",
    };
    let carbon_reduction = total_sales * 0.002;
    let water_efficiency = if total_sales > 1000.0 { "High" } else { "Moderate" };

    let esg_score = (fair_trade_index * 50.0
        + unique_products as f64 * 10.0
        + carbon_reduction * 20.0)
        .clamp(0.0, 100.0);

    FarmerReport {
        farmer_name: farmer_name.to_string(),
        esg_score,
        social_impact: SocialImpact {
            fair_trade_index,
            community_engagement: community_engagement.to_string(),
        },
        environmental_impact: EnvironmentalImpact {
            carbon_reduction_tons: carbon_reduction,
            water_efficiency: water_efficiency.to_string(),
        },
    }
}

fn ledger_fixture() -> Vec<LedgerTxn> {
    let completed = (0..5u32).map(|i| LedgerTxn {
        transaction_id: format!("mock_txn_A{}_T{}", i, DEMO_TENANT_ID),
        status: "completed".to_string(),
        amount: 100.0 + f64::from(i),
        currency: "TWD".to_string(),
        order_id: 100 + i64::from(i),
    });
    let pending = (0..5u32).map(|i| LedgerTxn {
        transaction_id: format!("mock_txn_B{}_T{}", i, DEMO_TENANT_ID),
        status: "pending".to_string(),
        amount: 50.0 + f64::from(i),
        currency: "USD".to_string(),
        order_id: 200 + i64::from(i),
    });
    completed.chain(pending).collect()
}

/// Twenty points at five-minute intervals ending now, with a gentle
/// sawtooth on both readings.
fn iot_history(device_id: &str) -> Vec<IoTSample> {
    let now = Utc::now();
    (0..IOT_HISTORY_POINTS)
        .map(|i| {
            let step = i as f64;
            IoTSample {
                device_id: device_id.to_string(),
                timestamp: now
                    - Duration::minutes((IOT_HISTORY_POINTS - 1 - i) * IOT_INTERVAL_MINUTES),
                temperature: round2(20.0 + step * 0.5 + (i % 3) as f64),
                humidity: round2(50.0 + step * 0.3 + (i % 2) as f64),
            }
        })
        .collect()
}

#[async_trait]
impl ResourceGateway for MemoryGateway {
    async fn fetch_farmer_report(&self, farmer_id: i64) -> Result<FarmerReport, GatewayError> {
        if farmer_id != DEMO_FARMER_ID {
            return Err(GatewayError::Status {
                status: 404,
                detail: "Farmer not found".to_string(),
            });
        }

        let state = self.state.lock().await;
        Ok(esg_report(DEMO_FARMER_NAME, &state.orders))
    }

    async fn fetch_products(&self, limit: u32, offset: u32) -> Result<Vec<Product>, GatewayError> {
        Ok(page(&self.state.lock().await.products, limit, offset))
    }

    async fn fetch_orders(&self, limit: u32, offset: u32) -> Result<Vec<Order>, GatewayError> {
        Ok(page(&self.state.lock().await.orders, limit, offset))
    }

    async fn fetch_ledger_transactions(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<LedgerTxn>, GatewayError> {
        Ok(page(&ledger_fixture(), limit, offset))
    }

    async fn fetch_iot_data(
        &self,
        device_id: &str,
        limit: u32,
    ) -> Result<Vec<IoTSample>, GatewayError> {
        let mut state = self.state.lock().await;
        let history = state
            .iot
            .entry(device_id.to_string())
            .or_insert_with(|| iot_history(device_id));

        let start = history.len().saturating_sub(limit as usize);
        Ok(history[start..].to_vec())
    }

    async fn fetch_blockchain_transactions(
        &self,
        limit: u32,
    ) -> Result<Vec<ChainTxn>, GatewayError> {
        let state = self.state.lock().await;
        Ok(state
            .chain
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_blockchain_transaction(
        &self,
        draft: &ChainTxnDraft,
    ) -> Result<ChainTxn, GatewayError> {
        let mut state = self.state.lock().await;

        let record = ChainTxn {
            sender: draft.sender.clone(),
            receiver: draft.receiver.clone(),
            amount: draft.amount,
            hash: Uuid::new_v4().simple().to_string(),
            timestamp: Utc::now(),
            block_id: state.chain.len() as i64 + 1,
        };
        state.chain.push(record.clone());

        tracing::info!(hash = %record.hash, block_id = record.block_id, "recorded mock chain transaction");
        Ok(record)
    }

    async fn send_notification(
        &self,
        recipient_id: &str,
        message: &str,
    ) -> Result<NotificationAck, GatewayError> {
        // LINE user ids start with 'U'; the placeholder is never a real user.
        if !recipient_id.starts_with('U') || recipient_id == self.placeholder_user_id {
            tracing::warn!(recipient_id, "rejecting LINE push to invalid user id");
            return Err(GatewayError::Status {
                status: 500,
                detail: "Failed to send LINE notification".to_string(),
            });
        }

        self.state.lock().await.outbox.push(NotificationRequest {
            user_id: recipient_id.to_string(),
            message: message.to_string(),
        });

        Ok(NotificationAck {
            message: "LINE notification mock sent successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "Udeadbeefdeadbeefdeadbeefdeadbeef";

    #[tokio::test]
    async fn chain_lists_newest_first_within_limit() {
        let gateway = MemoryGateway::new(PLACEHOLDER);
        for (sender, amount) in [("A", 10.0), ("C", 20.0), ("E", 30.0)] {
            gateway
                .create_blockchain_transaction(&ChainTxnDraft::new(sender, "X", amount))
                .await
                .unwrap();
        }

        let latest = gateway.fetch_blockchain_transactions(2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].amount, 30.0);
        assert_eq!(latest[0].block_id, 3);
        assert_eq!(latest[1].amount, 20.0);
    }

    #[tokio::test]
    async fn empty_chain_is_an_empty_list() {
        let gateway = MemoryGateway::new(PLACEHOLDER);
        assert!(gateway.fetch_blockchain_transactions(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_pagination_slices_fixture() {
        let gateway = MemoryGateway::new(PLACEHOLDER);

        let first = gateway.fetch_ledger_transactions(10, 0).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].transaction_id, "mock_txn_A0_T1");

        let tail = gateway.fetch_ledger_transactions(10, 8).await.unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[1].currency, "USD");
    }

    #[tokio::test]
    async fn iot_returns_latest_samples_oldest_first() {
        let gateway = MemoryGateway::new(PLACEHOLDER);

        let samples = gateway.fetch_iot_data("sensor-001", 5).await.unwrap();
        assert_eq!(samples.len(), 5);
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        let all = gateway.fetch_iot_data("sensor-001", 100).await.unwrap();
        assert_eq!(all.len(), IOT_HISTORY_POINTS as usize);
        assert_eq!(all.last(), samples.last());
    }

    #[tokio::test]
    async fn placeholder_recipient_is_rejected_by_backend() {
        let gateway = MemoryGateway::new(PLACEHOLDER);

        let err = gateway.send_notification(PLACEHOLDER, "hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500, .. }));
        assert!(gateway.sent_notifications().await.is_empty());

        gateway.send_notification("U1234", "hi").await.unwrap();
        assert_eq!(gateway.sent_notifications().await.len(), 1);
    }

    #[test]
    fn esg_report_for_seeded_orders() {
        let gateway = MemoryGateway::seeded(PLACEHOLDER);
        let state = gateway.state.try_lock().unwrap();
        let report = esg_report(DEMO_FARMER_NAME, &state.orders);

        // 3 units over 2 distinct products
        assert_eq!(report.social_impact.community_engagement, "Moderate");
        assert_eq!(report.environmental_impact.water_efficiency, "Moderate");
        let expected = 0.015 * 50.0 + 20.0 + 0.006 * 20.0;
        assert!((report.esg_score - expected).abs() < 1e-9);
    }

    #[test]
    fn esg_report_without_sales_is_unrated() {
        let report = esg_report("Empty Farm", &[]);
        assert_eq!(report.esg_score, 0.0);
        assert_eq!(report.social_impact.community_engagement, "None");
    }
}

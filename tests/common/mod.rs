#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use agribridge_dashboard::config::SectionQueries;
use agribridge_dashboard::dashboard::{Dashboard, NotificationGuard, DEFAULT_PLACEHOLDER_USER_ID};
use agribridge_dashboard::error::GatewayError;
use agribridge_dashboard::gateway::ResourceGateway;
use agribridge_dashboard::models::{
    ChainTxn, ChainTxnDraft, EnvironmentalImpact, FarmerReport, IoTSample, LedgerTxn,
    NotificationAck, Order, Product, SocialImpact,
};
use agribridge_dashboard::session::TokenSession;

pub const PLACEHOLDER: &str = DEFAULT_PLACEHOLDER_USER_ID;

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, minute, 0).unwrap()
}

pub fn chain_txn(sender: &str, receiver: &str, amount: f64, hash: &str, block_id: i64) -> ChainTxn {
    ChainTxn {
        sender: sender.to_string(),
        receiver: receiver.to_string(),
        amount,
        hash: hash.to_string(),
        timestamp: at(block_id as u32),
        block_id,
    }
}

/// Gateway returning the fixed dashboard fixtures, with call counters and
/// switches for failures and for holding the IoT read open.
#[derive(Default)]
pub struct ScriptedGateway {
    pub fail_orders: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_notification: AtomicBool,
    pub iot_gate: Option<Arc<Notify>>,

    pub chain: Mutex<Vec<ChainTxn>>,
    pub sent: Mutex<Vec<(String, String)>>,

    pub notification_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub chain_reads: AtomicUsize,
    pub iot_reads: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            chain: Mutex::new(vec![chain_txn("A", "B", 10.0, "hash1", 1)]),
            ..Self::default()
        }
    }

    pub fn with_iot_gate(gate: Arc<Notify>) -> Self {
        Self {
            iot_gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn with_empty_chain() -> Self {
        Self::default()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn server_error(detail: &str) -> GatewayError {
    GatewayError::Status {
        status: 500,
        detail: detail.to_string(),
    }
}

#[async_trait]
impl ResourceGateway for ScriptedGateway {
    async fn fetch_farmer_report(&self, _farmer_id: i64) -> Result<FarmerReport, GatewayError> {
        Ok(FarmerReport {
            farmer_name: "Test Farmer".to_string(),
            esg_score: 95.5,
            social_impact: SocialImpact {
                fair_trade_index: 0.95,
                community_engagement: "High".to_string(),
            },
            environmental_impact: EnvironmentalImpact {
                carbon_reduction_tons: 2.5,
                water_efficiency: "High".to_string(),
            },
        })
    }

    async fn fetch_products(&self, _limit: u32, _offset: u32) -> Result<Vec<Product>, GatewayError> {
        Ok(vec![
            Product {
                id: 101,
                name: "Test Apple".to_string(),
                price: 25.5,
                farmer_id: 1,
                tenant_id: 1,
            },
            Product {
                id: 102,
                name: "Test Orange".to_string(),
                price: 30.0,
                farmer_id: 1,
                tenant_id: 1,
            },
        ])
    }

    async fn fetch_orders(&self, _limit: u32, _offset: u32) -> Result<Vec<Order>, GatewayError> {
        if self.fail_orders.load(Ordering::SeqCst) {
            return Err(server_error("orders unavailable"));
        }

        Ok(vec![
            Order {
                id: 1,
                product_id: 101,
                quantity: 2,
                total_price: 51.0,
                buyer_id: 10,
                status: "completed".to_string(),
                tenant_id: 1,
            },
            Order {
                id: 2,
                product_id: 102,
                quantity: 1,
                total_price: 30.0,
                buyer_id: 11,
                status: "pending".to_string(),
                tenant_id: 1,
            },
        ])
    }

    async fn fetch_ledger_transactions(
        &self,
        _limit: u32,
        _offset: u32,
    ) -> Result<Vec<LedgerTxn>, GatewayError> {
        Ok(vec![LedgerTxn {
            transaction_id: "txn1".to_string(),
            status: "completed".to_string(),
            amount: 100.0,
            currency: "TWD".to_string(),
            order_id: 1,
        }])
    }

    async fn fetch_iot_data(
        &self,
        device_id: &str,
        _limit: u32,
    ) -> Result<Vec<IoTSample>, GatewayError> {
        self.iot_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.iot_gate {
            gate.notified().await;
        }

        Ok(vec![
            IoTSample {
                device_id: device_id.to_string(),
                timestamp: at(0),
                temperature: 20.0,
                humidity: 50.0,
            },
            IoTSample {
                device_id: device_id.to_string(),
                timestamp: at(5),
                temperature: 21.0,
                humidity: 51.0,
            },
        ])
    }

    async fn fetch_blockchain_transactions(
        &self,
        limit: u32,
    ) -> Result<Vec<ChainTxn>, GatewayError> {
        self.chain_reads.fetch_add(1, Ordering::SeqCst);
        let chain = self.chain.lock().unwrap();
        Ok(chain.iter().take(limit as usize).cloned().collect())
    }

    async fn create_blockchain_transaction(
        &self,
        draft: &ChainTxnDraft,
    ) -> Result<ChainTxn, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(server_error("chain offline"));
        }

        let mut chain = self.chain.lock().unwrap();
        let record = chain_txn(
            &draft.sender,
            &draft.receiver,
            draft.amount,
            "newhash",
            chain.len() as i64 + 1,
        );
        // Server lists newest first.
        chain.insert(0, record.clone());
        Ok(record)
    }

    async fn send_notification(
        &self,
        recipient_id: &str,
        message: &str,
    ) -> Result<NotificationAck, GatewayError> {
        self.notification_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_notification.load(Ordering::SeqCst) {
            return Err(server_error("Failed to send LINE notification"));
        }

        self.sent
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), message.to_string()));
        Ok(NotificationAck {
            message: "Sent".to_string(),
        })
    }
}

pub fn dashboard_with(gateway: Arc<ScriptedGateway>) -> Dashboard {
    Dashboard::new(
        gateway,
        Arc::new(TokenSession::with_token("mock-jwt-token")),
        SectionQueries::default(),
        NotificationGuard::new(PLACEHOLDER),
    )
}

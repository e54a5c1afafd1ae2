//! Data models for the AgriBridge dashboard

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub(crate) mod wire;

/// Farmer ESG report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerReport {
    pub farmer_name: String,
    pub esg_score: f64,
    pub social_impact: SocialImpact,
    pub environmental_impact: EnvironmentalImpact,
}

/// Social half of an ESG report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialImpact {
    pub fair_trade_index: f64,
    pub community_engagement: String,
}

/// Environmental half of an ESG report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub carbon_reduction_tons: f64,
    pub water_efficiency: String,
}

/// Product model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub farmer_id: i64,
    pub tenant_id: i64,
}

/// Order model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub total_price: f64,
    pub buyer_id: i64,
    pub status: String, // completed, pending, ...
    pub tenant_id: i64,
}

/// Financial ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTxn {
    pub transaction_id: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    pub order_id: i64,
}

/// One IoT telemetry sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IoTSample {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}

/// Recorded blockchain transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTxn {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub block_id: i64,
}

/// Blockchain transaction creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChainTxnDraft {
    #[validate(custom = "not_blank")]
    pub sender: String,
    #[validate(custom = "not_blank")]
    pub receiver: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ChainTxnDraft {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            data: None,
        }
    }

    /// Draft used by the "add mock transaction" action when the caller
    /// supplies no fields of its own.
    pub fn demo() -> Self {
        let mut rng = rand::thread_rng();
        let n: u32 = rng.gen_range(1..1000);
        let cents: u32 = rng.gen_range(100..10_000);

        Self {
            sender: format!("Farmer-{}", n),
            receiver: format!("Buyer-{}", n),
            amount: f64::from(cents) / 100.0,
            data: Some("AgriBridge mock trade".to_string()),
        }
    }

    /// Validate the draft before it is sent anywhere.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("amount must be a positive number, got {}", self.amount));
        }

        Ok(())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Outbound LINE notification; built at send time and dropped afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRequest {
    pub user_id: String,
    pub message: String,
}

/// Body of the dashboard's "send LINE notification" action
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationForm {
    #[serde(default)]
    pub user_id: String,
}

/// Delivery acknowledgement from the notification endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAck {
    pub message: String,
}

/// Bearer token returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

//! Backend wire shapes and their normalization into dashboard models.
//!
//! The AgriBridge API speaks snake_case JSON and leaves several fields
//! optional; the section payloads do not.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{
    ChainTxn, EnvironmentalImpact, FarmerReport, IoTSample, LedgerTxn, Order, Product,
    SocialImpact,
};
use crate::error::GatewayError;

const UNRATED: &str = "None";

#[derive(Debug, Deserialize)]
pub struct EsgReportWire {
    pub farmer_name: String,
    pub esg_score: f64,
    pub social_impact: SocialImpactWire,
    pub environmental_impact: EnvironmentalImpactWire,
}

#[derive(Debug, Deserialize)]
pub struct SocialImpactWire {
    #[serde(default)]
    pub fair_trade_index: Option<f64>,
    #[serde(default)]
    pub community_engagement: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnvironmentalImpactWire {
    #[serde(default)]
    pub carbon_footprint_reduction_tons: Option<f64>,
    #[serde(default)]
    pub water_usage_efficiency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductWire {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub farmer_id: i64,
    pub tenant_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct OrderWire {
    pub id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub total_price: f64,
    pub buyer_id: i64,
    pub status: String,
    pub tenant_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentWire {
    pub transaction_id: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    pub order_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct IoTDataWire {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BlockchainTxnWire {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub block_id: Option<i64>,
}

/// FastAPI error body
#[derive(Debug, Deserialize)]
pub struct ErrorDetailWire {
    pub detail: serde_json::Value,
}

impl From<EsgReportWire> for FarmerReport {
    fn from(wire: EsgReportWire) -> Self {
        Self {
            farmer_name: wire.farmer_name,
            esg_score: wire.esg_score,
            social_impact: SocialImpact {
                fair_trade_index: wire.social_impact.fair_trade_index.unwrap_or(0.0),
                community_engagement: wire
                    .social_impact
                    .community_engagement
                    .unwrap_or_else(|| UNRATED.to_string()),
            },
            environmental_impact: EnvironmentalImpact {
                carbon_reduction_tons: wire
                    .environmental_impact
                    .carbon_footprint_reduction_tons
                    .unwrap_or(0.0),
                water_efficiency: wire
                    .environmental_impact
                    .water_usage_efficiency
                    .unwrap_or_else(|| UNRATED.to_string()),
            },
        }
    }
}

impl From<ProductWire> for Product {
    fn from(wire: ProductWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            price: wire.price,
            farmer_id: wire.farmer_id,
            tenant_id: wire.tenant_id,
        }
    }
}

impl From<OrderWire> for Order {
    fn from(wire: OrderWire) -> Self {
        Self {
            id: wire.id,
            product_id: wire.product_id,
            quantity: wire.quantity,
            total_price: wire.total_price,
            buyer_id: wire.buyer_id,
            status: wire.status,
            tenant_id: wire.tenant_id,
        }
    }
}

impl From<PaymentWire> for LedgerTxn {
    fn from(wire: PaymentWire) -> Self {
        Self {
            transaction_id: wire.transaction_id,
            status: wire.status,
            amount: wire.amount,
            currency: wire.currency,
            order_id: wire.order_id,
        }
    }
}

impl TryFrom<BlockchainTxnWire> for ChainTxn {
    type Error = GatewayError;

    fn try_from(wire: BlockchainTxnWire) -> Result<Self, Self::Error> {
        let missing = |field: &str| {
            GatewayError::Malformed(format!("blockchain transaction is missing `{}`", field))
        };

        Ok(Self {
            hash: wire.hash.ok_or_else(|| missing("hash"))?,
            timestamp: wire.timestamp.ok_or_else(|| missing("timestamp"))?,
            block_id: wire.block_id.ok_or_else(|| missing("block_id"))?,
            sender: wire.sender,
            receiver: wire.receiver,
            amount: wire.amount,
        })
    }
}

/// Keep samples that carry both readings, in their received order.
pub fn normalize_iot(samples: Vec<IoTDataWire>) -> Vec<IoTSample> {
    samples
        .into_iter()
        .filter_map(|wire| match (wire.temperature, wire.humidity) {
            (Some(temperature), Some(humidity)) => Some(IoTSample {
                device_id: wire.device_id,
                timestamp: wire.timestamp,
                temperature,
                humidity,
            }),
            _ => {
                tracing::debug!(device_id = %wire.device_id, "dropping IoT sample without temperature/humidity");
                None
            }
        })
        .collect()
}

pub fn normalize_chain(records: Vec<BlockchainTxnWire>) -> Result<Vec<ChainTxn>, GatewayError> {
    records.into_iter().map(ChainTxn::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn esg_report_maps_backend_field_names() {
        let wire: EsgReportWire = serde_json::from_value(json!({
            "farmer_name": "Test Farmer",
            "esg_score": 95.5,
            "social_impact": { "fair_trade_index": 0.95, "community_engagement": "High" },
            "environmental_impact": {
                "carbon_footprint_reduction_tons": 2.5,
                "water_usage_efficiency": "High"
            }
        }))
        .unwrap();

        let report = FarmerReport::from(wire);
        assert_eq!(report.farmer_name, "Test Farmer");
        assert_eq!(report.social_impact.fair_trade_index, 0.95);
        assert_eq!(report.environmental_impact.carbon_reduction_tons, 2.5);
        assert_eq!(report.environmental_impact.water_efficiency, "High");
    }

    #[test]
    fn esg_report_defaults_missing_impact_fields() {
        let wire: EsgReportWire = serde_json::from_value(json!({
            "farmer_name": "New Farm",
            "esg_score": 0.0,
            "social_impact": {},
            "environmental_impact": {}
        }))
        .unwrap();

        let report = FarmerReport::from(wire);
        assert_eq!(report.social_impact.community_engagement, "None");
        assert_eq!(report.environmental_impact.carbon_reduction_tons, 0.0);
    }

    #[test]
    fn iot_samples_without_readings_are_dropped() {
        let wire: Vec<IoTDataWire> = serde_json::from_value(json!([
            { "device_id": "sensor-001", "timestamp": "2023-01-01T00:00:00Z", "temperature": 20.0, "humidity": 50.0 },
            { "device_id": "sensor-001", "timestamp": "2023-01-01T00:05:00Z", "soil_moisture": 31.0 },
            { "device_id": "sensor-001", "timestamp": "2023-01-01T00:10:00Z", "temperature": 21.0, "humidity": 51.0 }
        ]))
        .unwrap();

        let samples = normalize_iot(wire);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].temperature, 21.0);
    }

    #[test]
    fn chain_record_without_hash_is_malformed() {
        let wire: Vec<BlockchainTxnWire> = serde_json::from_value(json!([
            { "sender": "A", "receiver": "B", "amount": 10.0 }
        ]))
        .unwrap();

        assert!(matches!(normalize_chain(wire), Err(GatewayError::Malformed(_))));
    }
}

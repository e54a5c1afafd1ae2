//! Formatted, presentation-ready views derived from section state.
//!
//! Everything here is synchronous and pure: a view is recomputed from the
//! current [`SectionState`] on demand and never feeds back into the store.

use serde::Serialize;

use super::section::{Section, SectionPayload, SectionState};
use crate::models::{ChainTxn, FarmerReport, IoTSample, LedgerTxn, Order, Product};

pub const LOADING_TEXT: &str = "載入中...";
pub const EMPTY_TEXT: &str = "暫無資料";

const LEDGER_ID_CHARS: usize = 8;
const CHAIN_HASH_CHARS: usize = 10;

pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn clip(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

pub fn product_line(product: &Product) -> String {
    format!("{} - {}", product.name, money(product.price))
}

pub fn order_line(order: &Order) -> String {
    format!(
        "訂單 #{} - {} (狀態: {})",
        order.id,
        money(order.total_price),
        order.status
    )
}

pub fn ledger_line(txn: &LedgerTxn) -> String {
    format!(
        "交易ID: {}... - {} ({})",
        clip(&txn.transaction_id, LEDGER_ID_CHARS),
        money(txn.amount),
        txn.status
    )
}

pub fn chain_line(txn: &ChainTxn) -> String {
    format!(
        "Tx: {}... | {} | From: {}",
        clip(&txn.hash, CHAIN_HASH_CHARS),
        money(txn.amount),
        txn.sender
    )
}

fn report_lines(report: &FarmerReport) -> Vec<String> {
    vec![
        format!("農民: {}", report.farmer_name),
        format!("ESG 分數: {:.1}", report.esg_score),
        format!("公平貿易指數: {:.2}", report.social_impact.fair_trade_index),
        format!("社區參與: {}", report.social_impact.community_engagement),
        format!(
            "碳減排: {:.2} 噸",
            report.environmental_impact.carbon_reduction_tons
        ),
        format!("用水效率: {}", report.environmental_impact.water_efficiency),
    ]
}

/// Most recent IoT sample, formatted for the monitoring card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IoTReading {
    pub device: String,
    pub temperature: String,
    pub humidity: String,
}

impl IoTReading {
    pub fn from_sample(sample: &IoTSample) -> Self {
        Self {
            device: format!("設備ID: {}", sample.device_id),
            temperature: format!("溫度: {:.1}°C", sample.temperature),
            humidity: format!("濕度: {:.1}%", sample.humidity),
        }
    }

    /// Samples arrive newest-last.
    pub fn latest(samples: &[IoTSample]) -> Option<Self> {
        samples.last().map(Self::from_sample)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Chart-ready series: one label per point and one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn iot(samples: &[IoTSample]) -> Self {
        Self {
            labels: samples
                .iter()
                .map(|s| s.timestamp.format("%H:%M").to_string())
                .collect(),
            datasets: vec![
                Dataset {
                    label: "溫度 (°C)".to_string(),
                    data: samples.iter().map(|s| s.temperature).collect(),
                },
                Dataset {
                    label: "濕度 (%)".to_string(),
                    data: samples.iter().map(|s| s.humidity).collect(),
                },
            ],
        }
    }

    pub fn esg(report: &FarmerReport) -> Self {
        Self {
            labels: vec![
                "ESG 分數".to_string(),
                "公平貿易指數 (x100)".to_string(),
                "碳減排 (噸)".to_string(),
            ],
            datasets: vec![Dataset {
                label: report.farmer_name.clone(),
                data: vec![
                    report.esg_score,
                    report.social_impact.fair_trade_index * 100.0,
                    report.environmental_impact.carbon_reduction_tons,
                ],
            }],
        }
    }
}

pub fn title(section: Section) -> &'static str {
    match section {
        Section::FarmerReport => "ESG 永續報告",
        Section::Products => "商品管理",
        Section::Orders => "訂單歷史",
        Section::Ledger => "財務帳務與金流",
        Section::IoT => "IoT 農場監測",
        Section::Blockchain => "區塊鏈交易記錄",
    }
}

/// Everything a presentation client needs to render one section card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub section: Section,
    pub title: &'static str,
    pub state: SectionState,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<IoTReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl SectionView {
    pub fn build(section: Section, state: &SectionState) -> Self {
        let mut view = Self {
            section,
            title: title(section),
            state: state.clone(),
            lines: Vec::new(),
            latest: None,
            chart: None,
            placeholder: None,
        };

        match state {
            SectionState::Idle | SectionState::Loading => {
                view.placeholder = Some(LOADING_TEXT.to_string());
            }
            SectionState::Failed(message) => {
                view.placeholder = Some(format!("載入失敗: {}", message));
            }
            SectionState::Ready(payload) => {
                view.fill(payload);
                if payload.is_empty() {
                    view.placeholder = Some(EMPTY_TEXT.to_string());
                }
            }
        }

        view
    }

    fn fill(&mut self, payload: &SectionPayload) {
        match payload {
            SectionPayload::FarmerReport(report) => {
                self.lines = report_lines(report);
                self.chart = Some(ChartSeries::esg(report));
            }
            SectionPayload::Products(items) => {
                self.lines = items.iter().map(product_line).collect();
            }
            SectionPayload::Orders(items) => {
                self.lines = items.iter().map(order_line).collect();
            }
            SectionPayload::Ledger(items) => {
                self.lines = items.iter().map(ledger_line).collect();
            }
            SectionPayload::IoT(samples) => {
                self.latest = IoTReading::latest(samples);
                if !samples.is_empty() {
                    self.chart = Some(ChartSeries::iot(samples));
                }
            }
            SectionPayload::Blockchain(items) => {
                self.lines = items.iter().map(chain_line).collect();
            }
        }
    }
}

/// Point-in-time copy of all six sections, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub active: bool,
    pub sections: Vec<SectionView>,
}

impl DashboardSnapshot {
    pub fn section(&self, section: Section) -> Option<&SectionView> {
        self.sections.iter().find(|view| view.section == section)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::{EnvironmentalImpact, SocialImpact};

    fn sample(minute: u32, temperature: f64, humidity: f64) -> IoTSample {
        IoTSample {
            device_id: "sensor-001".to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 0, minute, 0).unwrap(),
            temperature,
            humidity,
        }
    }

    #[test]
    fn list_lines_match_card_copy() {
        let product = Product {
            id: 101,
            name: "Test Apple".to_string(),
            price: 25.5,
            farmer_id: 1,
            tenant_id: 1,
        };
        assert_eq!(product_line(&product), "Test Apple - $25.50");

        let order = Order {
            id: 1,
            product_id: 101,
            quantity: 2,
            total_price: 51.0,
            buyer_id: 10,
            status: "completed".to_string(),
            tenant_id: 1,
        };
        assert_eq!(order_line(&order), "訂單 #1 - $51.00 (狀態: completed)");

        let txn = LedgerTxn {
            transaction_id: "txn1".to_string(),
            status: "completed".to_string(),
            amount: 100.0,
            currency: "TWD".to_string(),
            order_id: 1,
        };
        assert_eq!(ledger_line(&txn), "交易ID: txn1... - $100.00 (completed)");
    }

    #[test]
    fn long_identifiers_are_clipped() {
        let txn = LedgerTxn {
            transaction_id: "mock_txn_A0_T1".to_string(),
            status: "pending".to_string(),
            amount: 50.0,
            currency: "USD".to_string(),
            order_id: 200,
        };
        assert_eq!(ledger_line(&txn), "交易ID: mock_txn... - $50.00 (pending)");

        let chain = ChainTxn {
            sender: "A".to_string(),
            receiver: "B".to_string(),
            amount: 10.0,
            hash: "0123456789abcdef".to_string(),
            timestamp: Utc::now(),
            block_id: 1,
        };
        assert_eq!(chain_line(&chain), "Tx: 0123456789... | $10.00 | From: A");
    }

    #[test]
    fn latest_iot_reading_uses_last_sample() {
        let samples = vec![sample(0, 20.0, 50.0), sample(5, 21.0, 51.0)];
        let reading = IoTReading::latest(&samples).unwrap();

        assert_eq!(reading.device, "設備ID: sensor-001");
        assert_eq!(reading.temperature, "溫度: 21.0°C");
        assert_eq!(reading.humidity, "濕度: 51.0%");
        assert!(IoTReading::latest(&[]).is_none());
    }

    #[test]
    fn iot_chart_labels_by_minute() {
        let chart = ChartSeries::iot(&[sample(0, 20.0, 50.0), sample(5, 21.0, 51.0)]);
        assert_eq!(chart.labels, vec!["00:00", "00:05"]);
        assert_eq!(chart.datasets[0].data, vec![20.0, 21.0]);
        assert_eq!(chart.datasets[1].data, vec![50.0, 51.0]);
    }

    #[test]
    fn esg_chart_scales_fair_trade_index() {
        let report = FarmerReport {
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
        };

        let chart = ChartSeries::esg(&report);
        assert_eq!(chart.datasets[0].data, vec![95.5, 95.0, 2.5]);
    }

    #[test]
    fn placeholders_follow_state() {
        let loading = SectionView::build(Section::Products, &SectionState::Loading);
        assert_eq!(loading.placeholder.as_deref(), Some(LOADING_TEXT));

        let failed = SectionView::build(
            Section::Orders,
            &SectionState::Failed("HTTP 500: boom".to_string()),
        );
        assert_eq!(failed.placeholder.as_deref(), Some("載入失敗: HTTP 500: boom"));
        assert!(failed.lines.is_empty());

        let empty = SectionView::build(
            Section::Blockchain,
            &SectionState::Ready(SectionPayload::Blockchain(Vec::new())),
        );
        assert_eq!(empty.placeholder.as_deref(), Some(EMPTY_TEXT));
        assert_eq!(empty.title, "區塊鏈交易記錄");
    }
}

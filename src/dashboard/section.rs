//! Section identifiers and the per-section state machine values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{ChainTxn, FarmerReport, IoTSample, LedgerTxn, Order, Product};

/// One of the six independently tracked dashboard data domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    FarmerReport,
    Products,
    Orders,
    Ledger,
    #[serde(rename = "iot")]
    IoT,
    Blockchain,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::FarmerReport,
        Section::Products,
        Section::Orders,
        Section::Ledger,
        Section::IoT,
        Section::Blockchain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::FarmerReport => "farmer-report",
            Section::Products => "products",
            Section::Orders => "orders",
            Section::Ledger => "ledger",
            Section::IoT => "iot",
            Section::Blockchain => "blockchain",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dashboard section `{}`", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Ready payload of a section; the variant always matches the section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionPayload {
    FarmerReport(FarmerReport),
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Ledger(Vec<LedgerTxn>),
    IoT(Vec<IoTSample>),
    Blockchain(Vec<ChainTxn>),
}

impl SectionPayload {
    pub fn section(&self) -> Section {
        match self {
            SectionPayload::FarmerReport(_) => Section::FarmerReport,
            SectionPayload::Products(_) => Section::Products,
            SectionPayload::Orders(_) => Section::Orders,
            SectionPayload::Ledger(_) => Section::Ledger,
            SectionPayload::IoT(_) => Section::IoT,
            SectionPayload::Blockchain(_) => Section::Blockchain,
        }
    }

    /// Record count for list-shaped payloads.
    pub fn len(&self) -> Option<usize> {
        match self {
            SectionPayload::FarmerReport(_) => None,
            SectionPayload::Products(items) => Some(items.len()),
            SectionPayload::Orders(items) => Some(items.len()),
            SectionPayload::Ledger(items) => Some(items.len()),
            SectionPayload::IoT(items) => Some(items.len()),
            SectionPayload::Blockchain(items) => Some(items.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// State slot of one section.
///
/// `Idle` before activation and after teardown; every fetch cycle goes
/// `Loading` then exactly one of `Ready` / `Failed`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum SectionState {
    #[default]
    Idle,
    Loading,
    Ready(SectionPayload),
    Failed(String),
}

impl SectionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SectionState::Ready(_) | SectionState::Failed(_))
    }

    pub fn payload(&self) -> Option<&SectionPayload> {
        match self {
            SectionState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SectionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

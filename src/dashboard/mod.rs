//! Dashboard core.
//!
//! Six independent sections, each with its own state slot. [`Dashboard`]
//! fires one read per section on activation and writes each outcome only to
//! that section's slot, so a slow or failing section never holds back the
//! others. Readers get cloned snapshots or `watch` receivers; nothing outside
//! this module can write a slot.

mod notify;
mod orchestrator;
mod section;
mod store;
mod views;

pub use notify::{
    reminder_message, Notice, NoticeLevel, NotificationGuard, CHAIN_TXN_CREATED,
    CHAIN_TXN_FAILED, DEFAULT_PLACEHOLDER_USER_ID, NOTIFICATION_FAILED, NOTIFICATION_SENT,
    REMINDER_PHRASE,
};
pub use orchestrator::Dashboard;
pub use section::{Section, SectionPayload, SectionState, UnknownSection};
pub use views::{
    chain_line, ledger_line, money, order_line, product_line, title, ChartSeries,
    DashboardSnapshot, Dataset, IoTReading, SectionView, EMPTY_TEXT, LOADING_TEXT,
};

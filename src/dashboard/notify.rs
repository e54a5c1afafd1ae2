//! Notification dispatch guard and the transient notices both dashboard
//! actions emit.

use chrono::Local;
use serde::Serialize;

use crate::error::DashboardError;
use crate::models::NotificationRequest;

/// Pre-filled LINE user id that means "nothing chosen yet".
pub const DEFAULT_PLACEHOLDER_USER_ID: &str = "Udeadbeefdeadbeefdeadbeefdeadbeef";

pub const REMINDER_PHRASE: &str = "AgriBridge 提醒: 您有一筆新訂單待處理";
pub const NOTIFICATION_SENT: &str = "LINE 通知已發送（模擬）";
pub const NOTIFICATION_FAILED: &str = "LINE 通知發送失敗";
pub const CHAIN_TXN_CREATED: &str = "已新增模擬區塊鏈交易！";
pub const CHAIN_TXN_FAILED: &str = "新增模擬區塊鏈交易失敗";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing acknowledgement of an action. Never stored in section state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Rejects blank recipients and the placeholder id before any network call.
///
/// This is a usability guard only. Anything else non-blank is accepted as-is.
#[derive(Debug, Clone)]
pub struct NotificationGuard {
    placeholder: String,
}

impl NotificationGuard {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn validate<'a>(&self, recipient: &'a str) -> Result<&'a str, DashboardError> {
        if recipient.trim().is_empty() || recipient == self.placeholder {
            return Err(DashboardError::InvalidRecipient);
        }
        Ok(recipient)
    }

    /// Validate and build the request that goes to the gateway.
    pub fn prepare(&self, recipient: &str) -> Result<NotificationRequest, DashboardError> {
        let user_id = self.validate(recipient)?;
        Ok(NotificationRequest {
            user_id: user_id.to_string(),
            message: reminder_message(),
        })
    }
}

impl Default for NotificationGuard {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_USER_ID)
    }
}

pub fn reminder_message() -> String {
    format!(
        "{}，請盡快確認！(時間: {})",
        REMINDER_PHRASE,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

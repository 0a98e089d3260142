//! Alert: a notification emitted by the Alert Generator. Created, then
//! only ever flagged read/dismissed — never deleted.

use crate::ids::{AlertId, BatchId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    ExpirationWarning,
    ExpirationCritical,
    Expired,
    LowStock,
    DeadStock,
    ReorderPoint,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ExpirationWarning => "EXPIRATION_WARNING",
            AlertType::ExpirationCritical => "EXPIRATION_CRITICAL",
            AlertType::Expired => "EXPIRED",
            AlertType::LowStock => "LOW_STOCK",
            AlertType::DeadStock => "DEAD_STOCK",
            AlertType::ReorderPoint => "REORDER_POINT",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "INFO",
            AlertSeverity::Warning => "WARNING",
            AlertSeverity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub batch_id: Option<BatchId>,
    pub item_id: Option<ItemId>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        batch_id: Option<BatchId>,
        item_id: Option<ItemId>,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AlertId::new(),
            alert_type,
            severity,
            batch_id,
            item_id,
            title: title.into(),
            message: message.into(),
            is_read: false,
            is_dismissed: false,
            created_at,
        }
    }
}

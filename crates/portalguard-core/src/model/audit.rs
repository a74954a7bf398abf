//! Audit record schema.
//!
//! One record is produced per intercepted invocation. Records are immutable
//! once built and are handed off to an audit store by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failed,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Success => "SUCCESS",
            AuditStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor_id: String,
    pub actor_name: String,
    /// Organization, workspace or project id depending on the scope level.
    pub scope_id: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Value,
    pub status: AuditStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn is_failure(&self) -> bool {
        self.status == AuditStatus::Failed
    }
}

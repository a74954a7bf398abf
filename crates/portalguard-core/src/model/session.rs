use serde::{Deserialize, Serialize};

/// Live VM session as reported by the session directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub status: String,
    pub vm_instance_id: String,
    pub project_id: String,
    #[serde(default)]
    pub connection_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default)]
    pub credits_used: f64,
    #[serde(default)]
    pub heartbeat_count: u64,
}

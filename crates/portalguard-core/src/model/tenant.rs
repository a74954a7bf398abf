use serde::{Deserialize, Serialize};

/// A project/customer scope reachable through a subdomain or a custom domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Project identifier.
    pub id: String,
    /// Human readable project name.
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub custom_domain: Option<String>,
    pub organization_id: String,
}

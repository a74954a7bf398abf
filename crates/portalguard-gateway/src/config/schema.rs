use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use portalguard_core::error::{PortalError, Result};
use portalguard_core::model::{Principal, Role, Session, Tenant};

use crate::policy::allowlist::compile_grants;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub identity: IdentitySection,

    pub tenancy: TenancySection,

    #[serde(default)]
    pub audit: AuditSection,

    #[serde(default)]
    pub tenants: Vec<TenantConfig>,

    #[serde(default)]
    pub users: Vec<UserConfig>,

    /// role -> permission entries (`resource:action`, `resource:*` or `*`).
    #[serde(default = "default_roles")]
    pub roles: BTreeMap<String, Vec<String>>,

    /// Seed for the in-process session directory.
    #[serde(default)]
    pub sessions: Vec<SessionConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PortalError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.identity.validate()?;
        self.tenancy.validate()?;
        self.audit.validate()?;

        let mut subdomains = HashSet::new();
        let mut domains = HashSet::new();
        for t in &self.tenants {
            t.validate()?;
            if !subdomains.insert(t.subdomain.to_ascii_lowercase()) {
                return Err(PortalError::BadRequest(format!(
                    "duplicate tenant subdomain: {}",
                    t.subdomain
                )));
            }
            if let Some(d) = &t.custom_domain {
                if !domains.insert(d.to_ascii_lowercase()) {
                    return Err(PortalError::BadRequest(format!(
                        "duplicate tenant custom_domain: {d}"
                    )));
                }
            }
        }

        let mut emails = HashSet::new();
        for u in &self.users {
            if !emails.insert(u.email.to_ascii_lowercase()) {
                return Err(PortalError::BadRequest(format!("duplicate user email: {}", u.email)));
            }
        }

        for (role, grants) in &self.roles {
            if Role::parse(role).is_none() {
                return Err(PortalError::BadRequest(format!("unknown role in roles: {role}")));
            }
            compile_grants(grants)?;
        }

        let mut session_ids = HashSet::new();
        for s in &self.sessions {
            if !session_ids.insert(s.id.as_str()) {
                return Err(PortalError::BadRequest(format!("duplicate session id: {}", s.id)));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(PortalError::BadRequest(
                "gateway.listen must be a valid SocketAddr".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

impl IdentitySection {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < 16 {
            return Err(PortalError::BadRequest(
                "identity.jwt_secret must be at least 16 bytes".into(),
            ));
        }
        if self.leeway_secs > 300 {
            return Err(PortalError::BadRequest(
                "identity.leeway_secs must be between 0 and 300".into(),
            ));
        }
        Ok(())
    }
}

fn default_leeway_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenancySection {
    /// Portal apex domain, e.g. `example.com`; tenants live at `<subdomain>.<base_domain>`.
    pub base_domain: String,

    /// Subdomain labels that belong to the main portal rather than a tenant.
    #[serde(default = "default_main_labels")]
    pub main_labels: Vec<String>,
}

impl TenancySection {
    pub fn validate(&self) -> Result<()> {
        let d = self.base_domain.trim();
        if d.is_empty() || d.starts_with('.') || d.ends_with('.') {
            return Err(PortalError::BadRequest(
                "tenancy.base_domain must be a bare domain (e.g. example.com)".into(),
            ));
        }
        Ok(())
    }
}

fn default_main_labels() -> Vec<String> {
    vec!["www".into(), "app".into()]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSection {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Token that marks a string argument as a composite identifier (`org_42`).
    #[serde(default = "default_composite_id_separator")]
    pub composite_id_separator: String,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            composite_id_separator: default_composite_id_separator(),
        }
    }
}

impl AuditSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=65536).contains(&self.queue_capacity) {
            return Err(PortalError::BadRequest(
                "audit.queue_capacity must be between 1 and 65536".into(),
            ));
        }
        if self.composite_id_separator.is_empty() {
            return Err(PortalError::BadRequest(
                "audit.composite_id_separator must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_queue_capacity() -> usize {
    1024
}
fn default_composite_id_separator() -> String {
    "_".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    pub id: String,
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub custom_domain: Option<String>,
    pub organization_id: String,
}

impl TenantConfig {
    fn validate(&self) -> Result<()> {
        let label = &self.subdomain;
        let ok = !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !ok {
            return Err(PortalError::BadRequest(format!(
                "tenant {} subdomain must be a single DNS label: {label}",
                self.id
            )));
        }
        Ok(())
    }

    pub fn to_tenant(&self) -> Tenant {
        Tenant {
            id: self.id.clone(),
            name: self.name.clone(),
            subdomain: self.subdomain.to_ascii_lowercase(),
            custom_domain: self.custom_domain.as_ref().map(|d| d.to_ascii_lowercase()),
            organization_id: self.organization_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub organization_id: String,
    pub role: Role,
}

impl UserConfig {
    pub fn to_principal(&self) -> Principal {
        Principal {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            organization_id: self.organization_id.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
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

impl SessionConfig {
    pub fn to_session(&self) -> Session {
        Session {
            id: self.id.clone(),
            status: self.status.clone(),
            vm_instance_id: self.vm_instance_id.clone(),
            project_id: self.project_id.clone(),
            connection_url: self.connection_url.clone(),
            duration_seconds: self.duration_seconds,
            credits_used: self.credits_used,
            heartbeat_count: self.heartbeat_count,
        }
    }
}

fn default_roles() -> BTreeMap<String, Vec<String>> {
    let mut m = BTreeMap::new();
    m.insert("owner".into(), vec!["*".into()]);
    m.insert("admin".into(), vec!["*".into()]);
    m.insert(
        "member".into(),
        vec![
            "organization:read".into(),
            "workspace:*".into(),
            "vm_session:*".into(),
            "credits:read".into(),
        ],
    );
    m.insert(
        "viewer".into(),
        vec![
            "organization:read".into(),
            "workspace:read".into(),
            "vm_session:read".into(),
        ],
    );
    m
}

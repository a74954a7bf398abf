//! In-process directories seeded from config.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use dashmap::DashMap;

use portalguard_core::error::Result;
use portalguard_core::model::{Principal, Session, Tenant};

use crate::config::{GatewayConfig, TenancySection};

use super::{SessionDirectory, TenantDirectory, UserDirectory};

/// Static tenant map: `<subdomain>.<base_domain>` or an exact custom domain.
#[derive(Debug)]
pub struct StaticTenantDirectory {
    base_domain: String,
    main_labels: HashSet<String>,
    by_subdomain: HashMap<String, Tenant>,
    by_domain: HashMap<String, Tenant>,
}

impl StaticTenantDirectory {
    pub fn new(tenancy: &TenancySection, tenants: impl IntoIterator<Item = Tenant>) -> Self {
        let mut by_subdomain = HashMap::new();
        let mut by_domain = HashMap::new();
        for t in tenants {
            if let Some(d) = &t.custom_domain {
                by_domain.insert(d.to_ascii_lowercase(), t.clone());
            }
            by_subdomain.insert(t.subdomain.to_ascii_lowercase(), t);
        }
        Self {
            base_domain: tenancy.base_domain.trim().to_ascii_lowercase(),
            main_labels: tenancy
                .main_labels
                .iter()
                .map(|l| l.to_ascii_lowercase())
                .collect(),
            by_subdomain,
            by_domain,
        }
    }

    pub fn from_config(cfg: &GatewayConfig) -> Self {
        Self::new(&cfg.tenancy, cfg.tenants.iter().map(|t| t.to_tenant()))
    }

    /// Tenant label of `host` under the base domain, if any.
    fn subdomain_of<'a>(&self, host: &'a str) -> Option<&'a str> {
        let label = host.strip_suffix(self.base_domain.as_str())?.strip_suffix('.')?;
        if label.is_empty() || label.contains('.') || self.main_labels.contains(label) {
            return None;
        }
        Some(label)
    }
}

#[async_trait]
impl TenantDirectory for StaticTenantDirectory {
    async fn resolve_tenant(&self, host: &str) -> Result<Option<Tenant>> {
        let host = host.to_ascii_lowercase();
        if let Some(t) = self.by_domain.get(&host) {
            return Ok(Some(t.clone()));
        }
        Ok(self
            .subdomain_of(&host)
            .and_then(|label| self.by_subdomain.get(label))
            .cloned())
    }
}

/// Users keyed by lowercased email.
#[derive(Debug, Default)]
pub struct StaticUserDirectory {
    by_email: HashMap<String, Principal>,
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            by_email: users
                .into_iter()
                .map(|p| (p.email.to_ascii_lowercase(), p))
                .collect(),
        }
    }

    pub fn from_config(cfg: &GatewayConfig) -> Self {
        Self::new(cfg.users.iter().map(|u| u.to_principal()))
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<Principal>> {
        Ok(self.by_email.get(&email.trim().to_ascii_lowercase()).cloned())
    }
}

/// Live sessions, updated in place by whoever provisions VMs.
#[derive(Debug, Default)]
pub struct MemorySessionDirectory {
    sessions: DashMap<String, Session>,
}

impl MemorySessionDirectory {
    pub fn new(sessions: impl IntoIterator<Item = Session>) -> Self {
        let dir = Self::default();
        for s in sessions {
            dir.upsert(s);
        }
        dir
    }

    pub fn upsert(&self, session: Session) {
        self.sessions.insert(session.id.clone(), session);
    }
}

#[async_trait]
impl SessionDirectory for MemorySessionDirectory {
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(session_id).map(|e| e.value().clone()))
    }
}

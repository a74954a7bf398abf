//! Shared fixtures for gateway integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use portalguard_core::model::{Principal, Role, Session};
use portalguard_gateway::audit::{AuditInterceptor, AuditQueue, MemoryAuditStore};
use portalguard_gateway::config::{self, GatewayConfig};
use portalguard_gateway::context::RequestContext;
use portalguard_gateway::directory::MemorySessionDirectory;
use portalguard_gateway::obs::PortalMetrics;

pub const SECRET: &str = "test-secret-0123456789abcdef";

pub const CONFIG: &str = r#"
version: 1
identity:
  jwt_secret: "test-secret-0123456789abcdef"
  issuer: "portalguard"
tenancy:
  base_domain: "example.com"
tenants:
  - id: "proj_acme"
    name: "Acme"
    subdomain: "acme"
    custom_domain: "portal.acme.io"
    organization_id: "org_acme"
  - id: "proj_globex"
    name: "Globex"
    subdomain: "globex"
    organization_id: "org_globex"
users:
  - user_id: "usr_alice"
    email: "alice@acme.io"
    display_name: "Alice"
    organization_id: "org_acme"
    role: owner
  - user_id: "usr_victor"
    email: "victor@acme.io"
    display_name: "Victor"
    organization_id: "org_acme"
    role: viewer
sessions:
  - id: "sess_1"
    status: "RUNNING"
    vm_instance_id: "vm_9"
    project_id: "proj_acme"
    connection_url: "wss://vm9.example.com"
    duration_seconds: 300
    credits_used: 12.5
    heartbeat_count: 4
"#;

pub fn config() -> GatewayConfig {
    config::load_from_str(CONFIG).expect("fixture config must parse")
}

pub fn alice() -> Principal {
    Principal {
        user_id: "usr_alice".into(),
        email: "alice@acme.io".into(),
        display_name: "Alice".into(),
        organization_id: "org_acme".into(),
        role: Role::Owner,
    }
}

pub fn session_1() -> Session {
    Session {
        id: "sess_1".into(),
        status: "RUNNING".into(),
        vm_instance_id: "vm_9".into(),
        project_id: "proj_acme".into(),
        connection_url: Some("wss://vm9.example.com".into()),
        duration_seconds: 300,
        credits_used: 12.5,
        heartbeat_count: 4,
    }
}

pub fn ctx_as(principal: Option<Principal>) -> RequestContext {
    let ctx = RequestContext::new();
    if let Some(p) = principal {
        assert!(ctx.attach_principal(p));
    }
    ctx
}

/// Interceptor writing into an inspectable in-memory store.
pub struct AuditHarness {
    pub interceptor: AuditInterceptor,
    pub store: Arc<MemoryAuditStore>,
    pub sessions: Arc<MemorySessionDirectory>,
    pub metrics: Arc<PortalMetrics>,
}

impl AuditHarness {
    /// Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let metrics = Arc::new(PortalMetrics::default());
        let store = Arc::new(MemoryAuditStore::new());
        let sessions = Arc::new(MemorySessionDirectory::new([session_1()]));
        let queue = AuditQueue::spawn(store.clone(), 64, Arc::clone(&metrics));
        let interceptor =
            AuditInterceptor::new(queue, sessions.clone(), "_", Arc::clone(&metrics));
        Self {
            interceptor,
            store,
            sessions,
            metrics,
        }
    }

    pub async fn records(&self) -> Vec<portalguard_core::model::AuditRecord> {
        self.interceptor.queue().flush().await;
        self.store.records()
    }
}

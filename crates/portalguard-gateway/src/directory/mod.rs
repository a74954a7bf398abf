//! Collaborator interfaces consumed by the pipeline.
//!
//! Storage of tenants, users, sessions, role grants and audit records lives
//! outside this crate. The pipeline only talks to these traits; `memory`
//! provides config-seeded implementations for development and tests.

pub mod memory;

use async_trait::async_trait;

use portalguard_core::error::Result;
use portalguard_core::model::{AuditRecord, Permission, Principal, Role, Session, Tenant};

pub use memory::{MemorySessionDirectory, StaticTenantDirectory, StaticUserDirectory};

/// Host -> tenant lookup (subdomain or custom domain).
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn resolve_tenant(&self, host: &str) -> Result<Option<Tenant>>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<Principal>>;
}

#[async_trait]
pub trait SessionDirectory: Send + Sync {
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>>;
}

/// Role -> permission membership. Must answer without blocking.
pub trait RoleMembership: Send + Sync {
    fn has_permission(&self, role: Role, permission: Permission) -> bool;
}

/// Audit record sink. Called from the audit queue worker, never on the request path.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_audit_record(&self, record: AuditRecord) -> Result<()>;
}

//! Request-scoped context shared across layers.
//!
//! A `RequestContext` is created by the HTTP pipeline for every inbound request
//! and threaded explicitly through dispatch, authorization and audit. It owns
//! the principal (attached at most once) and a handle on the tenant context.

pub mod tenant;

use std::sync::{Arc, OnceLock};

use uuid::Uuid;

use portalguard_core::model::Principal;

pub use tenant::{TenantBinding, TenantContext, TenantScope};

#[derive(Debug)]
pub struct RequestContext {
    request_id: Uuid,
    principal: OnceLock<Principal>,
    tenant: Arc<TenantContext>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self::with_tenant_context(Arc::new(TenantContext::new()))
    }

    /// Build a context around an existing (possibly reused) tenant slot.
    pub fn with_tenant_context(tenant: Arc<TenantContext>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            principal: OnceLock::new(),
            tenant,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.get()
    }

    pub fn has_principal(&self) -> bool {
        self.principal.get().is_some()
    }

    /// Attach a principal. Returns false if one was already attached;
    /// the first principal wins.
    pub fn attach_principal(&self, principal: Principal) -> bool {
        self.principal.set(principal).is_ok()
    }

    pub fn tenant(&self) -> &Arc<TenantContext> {
        &self.tenant
    }
}

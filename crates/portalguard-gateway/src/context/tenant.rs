//! Tenant context: the active tenant identity of one request.
//!
//! A `TenantContext` is only ever populated through [`TenantContext::enter`],
//! which hands back a [`TenantScope`] guard. Dropping the guard clears the
//! context, so every exit path of the request (return, `?`, panic unwind,
//! future cancellation) leaves it empty for whoever uses it next.

use std::sync::{Arc, Mutex, MutexGuard};

use portalguard_core::model::Tenant;

/// Identifying fields of the tenant bound to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantBinding {
    pub subdomain: String,
    pub project_id: String,
    pub project_name: String,
    pub organization_id: String,
}

impl From<&Tenant> for TenantBinding {
    fn from(t: &Tenant) -> Self {
        Self {
            subdomain: t.subdomain.clone(),
            project_id: t.id.clone(),
            project_name: t.name.clone(),
            organization_id: t.organization_id.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TenantContext {
    slot: Mutex<Option<TenantBinding>>,
}

impl TenantContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `binding` (or explicitly clear, for `None`) until the returned guard drops.
    pub fn enter(self: &Arc<Self>, binding: Option<TenantBinding>) -> TenantScope {
        *self.lock() = binding;
        TenantScope {
            ctx: Arc::clone(self),
        }
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn has_context(&self) -> bool {
        self.lock().is_some()
    }

    pub fn subdomain(&self) -> Option<String> {
        self.lock().as_ref().map(|b| b.subdomain.clone())
    }

    pub fn project_id(&self) -> Option<String> {
        self.lock().as_ref().map(|b| b.project_id.clone())
    }

    pub fn project_name(&self) -> Option<String> {
        self.lock().as_ref().map(|b| b.project_name.clone())
    }

    pub fn organization_id(&self) -> Option<String> {
        self.lock().as_ref().map(|b| b.organization_id.clone())
    }

    /// Diagnostic one-liner for logs.
    pub fn summary(&self) -> String {
        match self.lock().as_ref() {
            Some(b) => format!(
                "TenantContext[subdomain={}, projectId={}, projectName={}, organizationId={}]",
                b.subdomain, b.project_id, b.project_name, b.organization_id
            ),
            None => "TenantContext[empty]".to_string(),
        }
    }

    // A poisoned lock still has to be cleared on the way out.
    fn lock(&self) -> MutexGuard<'_, Option<TenantBinding>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Completion hook for a tenant binding. Clears the context on drop.
#[must_use = "dropping the scope immediately clears the tenant context"]
#[derive(Debug)]
pub struct TenantScope {
    ctx: Arc<TenantContext>,
}

impl TenantScope {
    pub fn context(&self) -> &TenantContext {
        &self.ctx
    }
}

impl Drop for TenantScope {
    fn drop(&mut self) {
        self.ctx.clear();
    }
}

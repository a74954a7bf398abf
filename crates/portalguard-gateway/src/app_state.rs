//! Shared application state for the portalguard gateway.
//!
//! Wires collaborators into the pipeline components (identity, tenancy,
//! permissions, audit) and registers the built-in operations. Startup errors
//! are returned, not panicked.

use std::sync::Arc;

use portalguard_core::error::{PortalError, Result};
use portalguard_core::model::Permission;

use crate::audit::{AuditInterceptor, AuditQueue, TracingAuditStore};
use crate::config::GatewayConfig;
use crate::directory::{
    AuditStore, MemorySessionDirectory, RoleMembership, SessionDirectory, StaticTenantDirectory,
    StaticUserDirectory, TenantDirectory, UserDirectory,
};
use crate::dispatch::Dispatcher;
use crate::identity::IdentityResolver;
use crate::obs::PortalMetrics;
use crate::policy::{PermissionEvaluator, StaticRoleMembership};
use crate::services;
use crate::tenancy::TenantResolver;

const FAIL_FAST_ON_UNMAPPED_PERMISSION: bool = false; // if changed to true, boot fails.

/// External collaborators the pipeline talks to.
pub struct Collaborators {
    pub tenants: Arc<dyn TenantDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionDirectory>,
    pub roles: Arc<dyn RoleMembership>,
    pub audit_store: Arc<dyn AuditStore>,
}

impl Collaborators {
    /// In-process directories seeded from config; audit records go to the log.
    pub fn from_config(cfg: &GatewayConfig) -> Result<Self> {
        Ok(Self {
            tenants: Arc::new(StaticTenantDirectory::from_config(cfg)),
            users: Arc::new(StaticUserDirectory::from_config(cfg)),
            sessions: Arc::new(MemorySessionDirectory::new(
                cfg.sessions.iter().map(|s| s.to_session()),
            )),
            roles: Arc::new(StaticRoleMembership::compile(&cfg.roles)?),
            audit_store: Arc::new(TracingAuditStore),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<GatewayConfig>,
    identity: Arc<IdentityResolver>,
    tenants: Arc<TenantResolver>,
    interceptor: Arc<AuditInterceptor>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<PortalMetrics>,
}

impl AppState {
    /// Build state with config-seeded collaborators.
    /// Must be called inside a tokio runtime (spawns the audit writer).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let collab = Collaborators::from_config(&cfg)?;
        Self::with_collaborators(cfg, collab)
    }

    pub fn with_collaborators(cfg: GatewayConfig, collab: Collaborators) -> Result<Self> {
        let metrics = Arc::new(PortalMetrics::default());

        // 1) Pipeline components
        let identity = Arc::new(IdentityResolver::new(
            &cfg.identity,
            collab.users,
            Arc::clone(&metrics),
        ));
        let tenants = Arc::new(TenantResolver::new(collab.tenants, Arc::clone(&metrics)));
        let evaluator = Arc::new(PermissionEvaluator::new(collab.roles, Arc::clone(&metrics)));

        let queue = AuditQueue::spawn(
            collab.audit_store,
            cfg.audit.queue_capacity,
            Arc::clone(&metrics),
        );
        let interceptor = Arc::new(AuditInterceptor::new(
            queue,
            Arc::clone(&collab.sessions),
            cfg.audit.composite_id_separator.clone(),
            Arc::clone(&metrics),
        ));

        // 2) Operations
        let dispatcher = Dispatcher::new(
            evaluator,
            Arc::clone(&interceptor),
            Arc::clone(&metrics),
        );
        services::register_builtin(&dispatcher, collab.sessions);

        // 3) Every declared permission must exist in the static table
        for name in dispatcher.registered() {
            let Some((resource, action)) = dispatcher.required_permission(name) else {
                continue;
            };
            if Permission::lookup(resource, action).is_none() {
                tracing::warn!(op=%name, %resource, %action, "operation requires an unmapped permission; it will always deny");
                if FAIL_FAST_ON_UNMAPPED_PERMISSION {
                    return Err(PortalError::Internal(format!(
                        "operation {name} requires unmapped permission {resource}:{action}"
                    )));
                }
            }
        }

        tracing::info!(
            tenants = cfg.tenants.len(),
            users = cfg.users.len(),
            ops = ?dispatcher.registered(),
            "app state ready"
        );

        Ok(Self {
            cfg: Arc::new(cfg),
            identity,
            tenants,
            interceptor,
            dispatcher: Arc::new(dispatcher),
            metrics,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.cfg
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn tenants(&self) -> &TenantResolver {
        &self.tenants
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn metrics(&self) -> &PortalMetrics {
        &self.metrics
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Wait for queued audit records to reach the store.
    pub async fn flush_audit(&self) {
        self.interceptor.queue().flush().await;
    }
}

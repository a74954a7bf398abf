use std::sync::Arc;

use portalguard_core::error::{PortalError, Result};
use portalguard_core::model::{Permission, Role};

use crate::context::RequestContext;
use crate::directory::RoleMembership;
use crate::obs::PortalMetrics;

/// Decision from permission evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Permission),
    /// The (resource, action) pair has no canonical permission.
    DenyUnmapped,
    /// The role does not hold the permission.
    DenyNotGranted(Permission),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    fn label(self) -> (&'static str, &'static str) {
        match self {
            Decision::Allow(_) => ("allow", "granted"),
            Decision::DenyUnmapped => ("deny", "unmapped"),
            Decision::DenyNotGranted(_) => ("deny", "not_granted"),
        }
    }
}

/// Stateless (role, resource, action) evaluator. Unrecognized input denies.
pub struct PermissionEvaluator {
    membership: Arc<dyn RoleMembership>,
    metrics: Arc<PortalMetrics>,
}

impl PermissionEvaluator {
    pub fn new(membership: Arc<dyn RoleMembership>, metrics: Arc<PortalMetrics>) -> Self {
        Self { membership, metrics }
    }

    pub fn evaluate(&self, role: Role, resource_type: &str, action: &str) -> Decision {
        let decision = match Permission::lookup(resource_type, action) {
            None => Decision::DenyUnmapped,
            Some(p) if self.membership.has_permission(role, p) => Decision::Allow(p),
            Some(p) => Decision::DenyNotGranted(p),
        };
        let (d, reason) = decision.label();
        self.metrics
            .permission_decisions
            .inc(&[("decision", d), ("reason", reason)]);
        decision
    }

    pub fn is_allowed(&self, role: Role, resource_type: &str, action: &str) -> bool {
        self.evaluate(role, resource_type, action).is_allowed()
    }

    /// Enforce on behalf of a caller: anonymous requests need to authenticate,
    /// denied ones are not allowed.
    pub fn authorize(&self, ctx: &RequestContext, resource_type: &str, action: &str) -> Result<()> {
        let principal = ctx.principal().ok_or(PortalError::AuthRequired)?;
        match self.evaluate(principal.role, resource_type, action) {
            Decision::Allow(_) => Ok(()),
            Decision::DenyUnmapped | Decision::DenyNotGranted(_) => {
                tracing::info!(
                    request_id=%ctx.request_id(),
                    user=%principal.user_id,
                    role=%principal.role,
                    resource=%resource_type,
                    action=%action,
                    "permission denied"
                );
                Err(PortalError::NotAllowed(format!("{resource_type}:{action}")))
            }
        }
    }
}

use async_trait::async_trait;
use serde_json::{json, Value};

use portalguard_core::error::{PortalError, Result};

use crate::audit::CallArgs;
use crate::context::RequestContext;
use crate::dispatch::Operation;

/// Summary of the caller's organization.
#[derive(Default)]
pub struct OrganizationService;

impl OrganizationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operation for OrganizationService {
    fn name(&self) -> &'static str {
        "organization.describe"
    }

    fn required_permission(&self) -> Option<(&'static str, &'static str)> {
        Some(("organization", "read"))
    }

    async fn invoke(&self, ctx: &RequestContext, _args: &CallArgs) -> Result<Value> {
        let principal = ctx.principal().ok_or(PortalError::AuthRequired)?;
        let tenant = ctx.tenant();

        // A tenant host only serves its own organization.
        if let Some(org) = tenant.organization_id() {
            if org != principal.organization_id {
                return Err(PortalError::NotAllowed(
                    "organization does not own this tenant".into(),
                ));
            }
        }

        Ok(json!({
            "id": principal.organization_id,
            "role": principal.role,
            "projectId": tenant.project_id(),
        }))
    }
}

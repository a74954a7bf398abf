use async_trait::async_trait;
use serde_json::{json, Value};

use portalguard_core::error::{PortalError, Result};

use crate::audit::CallArgs;
use crate::context::RequestContext;
use crate::dispatch::Operation;

/// Open a workspace within the current tenant.
#[derive(Default)]
pub struct WorkspaceOpenService;

impl WorkspaceOpenService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operation for WorkspaceOpenService {
    fn name(&self) -> &'static str {
        "workspace.open"
    }

    fn required_permission(&self) -> Option<(&'static str, &'static str)> {
        Some(("workspace", "read"))
    }

    async fn invoke(&self, ctx: &RequestContext, args: &CallArgs) -> Result<Value> {
        let workspace_id = args
            .get_id("workspaceId")
            .ok_or_else(|| PortalError::BadRequest("workspace.open requires workspaceId".into()))?;
        let tenant = ctx.tenant();
        let project_id = tenant
            .project_id()
            .ok_or_else(|| PortalError::BadRequest("workspace.open requires a tenant host".into()))?;

        Ok(json!({
            "id": workspace_id,
            "projectId": project_id,
            "organizationId": tenant.organization_id(),
        }))
    }
}

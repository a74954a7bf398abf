use async_trait::async_trait;
use serde_json::{json, Value};

use portalguard_core::error::Result;

use crate::audit::CallArgs;
use crate::context::RequestContext;
use crate::dispatch::Operation;

/// Echo back who the caller is and which tenant the request resolved to.
#[derive(Default)]
pub struct ContextService;

impl ContextService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operation for ContextService {
    fn name(&self) -> &'static str {
        "context.describe"
    }

    async fn invoke(&self, ctx: &RequestContext, _args: &CallArgs) -> Result<Value> {
        Ok(describe(ctx))
    }
}

pub fn describe(ctx: &RequestContext) -> Value {
    let tenant = ctx.tenant();
    json!({
        "requestId": ctx.request_id().to_string(),
        "principal": ctx.principal(),
        "tenant": {
            "hasContext": tenant.has_context(),
            "subdomain": tenant.subdomain(),
            "projectId": tenant.project_id(),
            "projectName": tenant.project_name(),
            "organizationId": tenant.organization_id(),
            "summary": tenant.summary(),
        }
    })
}

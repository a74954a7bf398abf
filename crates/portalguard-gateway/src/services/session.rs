use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use portalguard_core::error::{PortalError, Result};

use crate::audit::CallArgs;
use crate::context::RequestContext;
use crate::directory::SessionDirectory;
use crate::dispatch::Operation;

/// Look up a live VM session.
pub struct SessionInspectService {
    sessions: Arc<dyn SessionDirectory>,
}

impl SessionInspectService {
    pub fn new(sessions: Arc<dyn SessionDirectory>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Operation for SessionInspectService {
    fn name(&self) -> &'static str {
        "session.inspect"
    }

    fn required_permission(&self) -> Option<(&'static str, &'static str)> {
        Some(("vm_session", "read"))
    }

    async fn invoke(&self, ctx: &RequestContext, args: &CallArgs) -> Result<Value> {
        let session_id = args
            .get_id("sessionId")
            .ok_or_else(|| PortalError::BadRequest("session.inspect requires sessionId".into()))?;
        let session = self
            .sessions
            .get_session(&session_id)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("session {session_id}")))?;

        if let Some(project) = ctx.tenant().project_id() {
            if project != session.project_id {
                return Err(PortalError::NotFound(format!("session {session_id}")));
            }
        }

        serde_json::to_value(&session).map_err(|e| PortalError::Internal(e.to_string()))
    }
}

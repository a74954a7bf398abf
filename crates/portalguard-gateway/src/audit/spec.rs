//! Declarative audit configuration attached to an operation at registration.

pub const DEFAULT_WORKSPACE_ID_PARAM: &str = "workspaceId";
pub const DEFAULT_SESSION_ID_PARAM: &str = "sessionId";

/// Granularity at which an audited action is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditScope {
    Org,
    Workspace {
        workspace_id_param: String,
    },
    VmSession {
        session_id_param: String,
        include_session_details: bool,
        include_metrics: bool,
    },
}

impl AuditScope {
    pub fn level(&self) -> &'static str {
        match self {
            AuditScope::Org => "ORG",
            AuditScope::Workspace { .. } => "WORKSPACE",
            AuditScope::VmSession { .. } => "VM_SESSION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSpec {
    pub action: String,
    pub resource_type: String,
    pub description: String,
    pub include_request_params: bool,
    pub include_response: bool,
    /// Emit a FAILED record when the operation fails. Never affects error propagation.
    pub audit_on_failure: bool,
    pub scope: AuditScope,
}

impl AuditSpec {
    fn new(action: impl Into<String>, resource_type: impl Into<String>, scope: AuditScope) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            description: String::new(),
            include_request_params: false,
            include_response: false,
            audit_on_failure: true,
            scope,
        }
    }

    pub fn org(action: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self::new(action, resource_type, AuditScope::Org)
    }

    pub fn workspace(action: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self::new(
            action,
            resource_type,
            AuditScope::Workspace {
                workspace_id_param: DEFAULT_WORKSPACE_ID_PARAM.to_string(),
            },
        )
    }

    pub fn vm_session(action: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self::new(
            action,
            resource_type,
            AuditScope::VmSession {
                session_id_param: DEFAULT_SESSION_ID_PARAM.to_string(),
                include_session_details: false,
                include_metrics: false,
            },
        )
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_request_params(mut self) -> Self {
        self.include_request_params = true;
        self
    }

    pub fn with_response(mut self) -> Self {
        self.include_response = true;
        self
    }

    pub fn audit_on_failure(mut self, enabled: bool) -> Self {
        self.audit_on_failure = enabled;
        self
    }

    /// Rename the workspace id argument. No effect outside workspace scope.
    pub fn workspace_id_param(mut self, name: impl Into<String>) -> Self {
        if let AuditScope::Workspace { workspace_id_param } = &mut self.scope {
            *workspace_id_param = name.into();
        }
        self
    }

    /// Rename the session id argument. No effect outside VM session scope.
    pub fn session_id_param(mut self, name: impl Into<String>) -> Self {
        if let AuditScope::VmSession { session_id_param, .. } = &mut self.scope {
            *session_id_param = name.into();
        }
        self
    }

    pub fn with_session_details(mut self) -> Self {
        if let AuditScope::VmSession { include_session_details, .. } = &mut self.scope {
            *include_session_details = true;
        }
        self
    }

    pub fn with_metrics(mut self) -> Self {
        if let AuditScope::VmSession { include_metrics, .. } = &mut self.scope {
            *include_metrics = true;
        }
        self
    }
}

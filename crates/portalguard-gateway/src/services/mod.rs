//! Built-in operations.
//!
//! These are thin read operations over the request context and the session
//! directory, one per audit scope, registered at startup by `AppState`.

pub mod context;
pub mod organization;
pub mod session;
pub mod workspace;

use std::sync::Arc;

use crate::audit::AuditSpec;
use crate::directory::SessionDirectory;
use crate::dispatch::Dispatcher;

pub use context::ContextService;
pub use organization::OrganizationService;
pub use session::SessionInspectService;
pub use workspace::WorkspaceOpenService;

pub fn register_builtin(dispatcher: &Dispatcher, sessions: Arc<dyn SessionDirectory>) {
    dispatcher.register(Arc::new(ContextService::new()));

    dispatcher.register_audited(
        OrganizationService::new(),
        AuditSpec::org("organization.view", "organization").describe("view organization summary"),
    );

    dispatcher.register_audited(
        WorkspaceOpenService::new(),
        AuditSpec::workspace("workspace.open", "workspace").with_request_params(),
    );

    dispatcher.register_audited(
        SessionInspectService::new(sessions),
        AuditSpec::vm_session("session.inspect", "vm_session")
            .with_session_details()
            .with_metrics()
            .audit_on_failure(false),
    );
}

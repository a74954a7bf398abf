//! Canonical permissions and the static (resource type, action verb) table.
//!
//! The table is the only way a (resource, action) pair becomes a permission.
//! Pairs that are not listed map to `None`, which callers must treat as
//! "no permission".

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // Organizations
    OrganizationRead,
    OrganizationUpdate,
    OrganizationDelete,
    OrganizationManageMembers,

    // Workspaces
    WorkspaceCreate,
    WorkspaceRead,
    WorkspaceUpdate,
    WorkspaceDelete,

    // VM sessions
    VmSessionStart,
    VmSessionRead,
    VmSessionStop,

    // Billing credits
    CreditsRead,
    CreditsAllocate,

    // Invitations
    InvitationCreate,
    InvitationRevoke,

    // Audit log / reports
    AuditLogRead,
    ReportExport,
}

/// (resource type, action verb) -> permission.
const TABLE: &[(&str, &str, Permission)] = &[
    ("organization", "read", Permission::OrganizationRead),
    ("organization", "update", Permission::OrganizationUpdate),
    ("organization", "delete", Permission::OrganizationDelete),
    ("organization", "manage_members", Permission::OrganizationManageMembers),
    ("workspace", "create", Permission::WorkspaceCreate),
    ("workspace", "read", Permission::WorkspaceRead),
    ("workspace", "update", Permission::WorkspaceUpdate),
    ("workspace", "delete", Permission::WorkspaceDelete),
    ("vm_session", "start", Permission::VmSessionStart),
    ("vm_session", "read", Permission::VmSessionRead),
    ("vm_session", "stop", Permission::VmSessionStop),
    ("credits", "read", Permission::CreditsRead),
    ("credits", "allocate", Permission::CreditsAllocate),
    ("invitation", "create", Permission::InvitationCreate),
    ("invitation", "revoke", Permission::InvitationRevoke),
    ("audit_log", "read", Permission::AuditLogRead),
    ("report", "export", Permission::ReportExport),
];

impl Permission {
    /// Every permission, in table order.
    pub fn all() -> impl Iterator<Item = Permission> {
        TABLE.iter().map(|(_, _, p)| *p)
    }

    /// Look up the canonical permission for a (resource type, action verb) pair.
    /// Matching is case-insensitive; unmapped pairs return `None`.
    pub fn lookup(resource_type: &str, action: &str) -> Option<Permission> {
        let resource_type = resource_type.trim();
        let action = action.trim();
        TABLE
            .iter()
            .find(|(r, a, _)| {
                r.eq_ignore_ascii_case(resource_type) && a.eq_ignore_ascii_case(action)
            })
            .map(|(_, _, p)| *p)
    }

    /// Parse the `resource:action` string form.
    pub fn parse(s: &str) -> Option<Permission> {
        let (resource_type, action) = s.split_once(':')?;
        Permission::lookup(resource_type, action)
    }

    pub fn resource_type(self) -> &'static str {
        self.entry().0
    }

    pub fn action(self) -> &'static str {
        self.entry().1
    }

    fn entry(self) -> (&'static str, &'static str) {
        TABLE
            .iter()
            .find(|(_, _, p)| *p == self)
            .map(|(r, a, _)| (*r, *a))
            .unwrap_or(("unknown", "unknown"))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type(), self.action())
    }
}

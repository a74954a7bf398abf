//! Role grant compilation and matching.
//!
//! Grant entries are `resource:action`, `resource:*` or a bare `*`.
//! They are compiled once at startup into a `StaticRoleMembership`.

use std::collections::{BTreeMap, HashMap};

use portalguard_core::error::{PortalError, Result};
use portalguard_core::model::{Permission, Role};

use crate::directory::RoleMembership;

/// Compiled grant rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantRule {
    All,
    Resource(String), // resource:*
    Exact(Permission),
}

impl GrantRule {
    fn matches(&self, permission: Permission) -> bool {
        match self {
            GrantRule::All => true,
            GrantRule::Resource(r) => permission.resource_type() == r,
            GrantRule::Exact(p) => *p == permission,
        }
    }
}

pub fn compile_grants(raw: &[String]) -> Result<Vec<GrantRule>> {
    let mut out = Vec::with_capacity(raw.len());
    for s in raw {
        let s = s.trim();
        if s == "*" {
            out.push(GrantRule::All);
            continue;
        }
        let (resource, action) = s.split_once(':').ok_or_else(|| {
            PortalError::BadRequest(format!("invalid grant: {s} (expected resource:action)"))
        })?;
        if action == "*" {
            if !Permission::all().any(|p| p.resource_type() == resource) {
                return Err(PortalError::BadRequest(format!("unknown resource in grant: {s}")));
            }
            out.push(GrantRule::Resource(resource.to_string()));
        } else {
            let p = Permission::lookup(resource, action)
                .ok_or_else(|| PortalError::BadRequest(format!("unknown permission in grant: {s}")))?;
            out.push(GrantRule::Exact(p));
        }
    }
    Ok(out)
}

/// Config-backed role membership.
#[derive(Debug, Default)]
pub struct StaticRoleMembership {
    grants: HashMap<Role, Vec<GrantRule>>,
}

impl StaticRoleMembership {
    pub fn compile(roles: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut grants = HashMap::new();
        for (name, raw) in roles {
            let role = Role::parse(name)
                .ok_or_else(|| PortalError::BadRequest(format!("unknown role: {name}")))?;
            grants.insert(role, compile_grants(raw)?);
        }
        Ok(Self { grants })
    }
}

impl RoleMembership for StaticRoleMembership {
    fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|rules| rules.iter().any(|r| r.matches(permission)))
    }
}

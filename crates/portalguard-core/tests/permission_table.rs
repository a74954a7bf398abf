#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::HashSet;

use portalguard_core::model::{Permission, Role};

#[test]
fn every_permission_has_one_unique_pair() {
    let mut pairs = HashSet::new();
    let mut count = 0;
    for p in Permission::all() {
        count += 1;
        assert!(pairs.insert((p.resource_type(), p.action())), "duplicate pair for {p:?}");
        assert_eq!(Permission::lookup(p.resource_type(), p.action()), Some(p));
        assert_eq!(Permission::parse(&p.to_string()), Some(p));
    }
    assert_eq!(count, 17);
}

#[test]
fn lookup_is_case_insensitive_and_trims() {
    assert_eq!(
        Permission::lookup("VM_SESSION", " Stop "),
        Some(Permission::VmSessionStop)
    );
    assert_eq!(Permission::parse("Credits:Allocate"), Some(Permission::CreditsAllocate));
}

#[test]
fn unmapped_pairs_are_none() {
    for (r, a) in [
        ("workspace", "explode"),
        ("spaceship", "read"),
        ("", "read"),
        ("workspace", ""),
        ("vm_session", "delete"),
    ] {
        assert_eq!(Permission::lookup(r, a), None, "{r}:{a}");
    }
    assert_eq!(Permission::parse("workspace"), None);
    assert_eq!(Permission::parse("workspace:read:extra"), None);
}

#[test]
fn display_uses_resource_action_form() {
    assert_eq!(Permission::OrganizationManageMembers.to_string(), "organization:manage_members");
    assert_eq!(Permission::AuditLogRead.to_string(), "audit_log:read");
}

#[test]
fn role_parsing() {
    assert_eq!(Role::parse("OWNER"), Some(Role::Owner));
    assert_eq!(Role::parse(" viewer "), Some(Role::Viewer));
    assert_eq!(Role::parse("superuser"), None);
    for r in Role::ALL {
        assert_eq!(Role::parse(r.as_str()), Some(r));
    }
}

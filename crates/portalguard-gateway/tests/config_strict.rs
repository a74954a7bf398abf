#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use portalguard_core::model::Role;
use portalguard_gateway::config;
use portalguard_gateway::policy::StaticRoleMembership;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
tenants:
  - id: "p1"
    name: "Acme"
    subdomian: "acme" # typo should fail
    organization_id: "org_1"
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert!(cfg.tenants.is_empty());
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.audit.queue_capacity, 1024);
    assert_eq!(cfg.audit.composite_id_separator, "_");
    assert_eq!(cfg.tenancy.main_labels, vec!["www".to_string(), "app".to_string()]);
    // default role grants compile
    StaticRoleMembership::compile(&cfg.roles).expect("default roles compile");
}

#[test]
fn fixture_config_parses() {
    let cfg = common::config();
    assert_eq!(cfg.tenants.len(), 2);
    assert_eq!(cfg.users[0].role, Role::Owner);
    assert_eq!(cfg.sessions[0].credits_used, 12.5);
}

#[test]
fn rejects_unsupported_version() {
    let bad = r#"
version: 2
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_short_jwt_secret() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "short"
tenancy:
  base_domain: "example.com"
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn rejects_duplicate_subdomain() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
tenants:
  - { id: "p1", name: "A", subdomain: "acme", organization_id: "o1" }
  - { id: "p2", name: "B", subdomain: "ACME", organization_id: "o2" }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("duplicate tenant subdomain"));
}

#[test]
fn rejects_dotted_subdomain() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
tenants:
  - { id: "p1", name: "A", subdomain: "a.b", organization_id: "o1" }
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn rejects_unknown_role_key() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
roles:
  superuser: ["*"]
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn rejects_zero_queue_capacity() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
audit:
  queue_capacity: 0
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn rejects_role_grant_that_does_not_compile() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
roles:
  member: ["bogus:x"]
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("bogus:x"));
}

#[test]
fn session_seed_is_strict_snake_case() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
sessions:
  - id: "s1"
    status: "RUNNING"
    vmInstanceId: "vm_1"
    project_id: "p1"
"#;
    assert!(config::load_from_str(bad).is_err());

    let cfg = common::config();
    let s = cfg.sessions[0].to_session();
    assert_eq!(s.vm_instance_id, "vm_9");
    assert_eq!(s.heartbeat_count, 4);
    assert_eq!(s, common::session_1());
}

#[test]
fn rejects_duplicate_session_id() {
    let bad = r#"
version: 1
identity:
  jwt_secret: "0123456789abcdef0123"
tenancy:
  base_domain: "example.com"
sessions:
  - { id: "s1", status: "RUNNING", vm_instance_id: "vm_1", project_id: "p1" }
  - { id: "s1", status: "STOPPED", vm_instance_id: "vm_2", project_id: "p1" }
"#;
    assert!(config::load_from_str(bad).is_err());
}

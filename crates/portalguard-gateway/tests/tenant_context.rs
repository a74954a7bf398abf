#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;

use portalguard_core::error::{PortalError, Result};
use portalguard_core::model::Tenant;
use portalguard_gateway::context::{TenantBinding, TenantContext};
use portalguard_gateway::directory::{StaticTenantDirectory, TenantDirectory};
use portalguard_gateway::obs::PortalMetrics;
use portalguard_gateway::tenancy::{normalize_host, TenantResolver};

fn resolver() -> (TenantResolver, Arc<PortalMetrics>) {
    let cfg = common::config();
    let metrics = Arc::new(PortalMetrics::default());
    let dir = Arc::new(StaticTenantDirectory::from_config(&cfg));
    (TenantResolver::new(dir, Arc::clone(&metrics)), metrics)
}

fn acme() -> TenantBinding {
    TenantBinding {
        subdomain: "acme".into(),
        project_id: "proj_acme".into(),
        project_name: "Acme".into(),
        organization_id: "org_acme".into(),
    }
}

struct FailingDirectory;

#[async_trait]
impl TenantDirectory for FailingDirectory {
    async fn resolve_tenant(&self, _host: &str) -> Result<Option<Tenant>> {
        Err(PortalError::Unavailable("tenant db down".into()))
    }
}

#[test]
fn empty_context_accessors() {
    let ctx = TenantContext::new();
    assert!(!ctx.has_context());
    assert_eq!(ctx.project_id(), None);
    assert_eq!(ctx.subdomain(), None);
    assert_eq!(ctx.summary(), "TenantContext[empty]");
}

#[test]
fn scope_populates_then_clears_on_drop() {
    let ctx = Arc::new(TenantContext::new());
    {
        let _scope = ctx.enter(Some(acme()));
        assert!(ctx.has_context());
        assert_eq!(ctx.project_id().as_deref(), Some("proj_acme"));
        assert_eq!(ctx.project_name().as_deref(), Some("Acme"));
        assert_eq!(ctx.organization_id().as_deref(), Some("org_acme"));
        assert!(ctx.summary().contains("projectId=proj_acme"));
    }
    assert!(!ctx.has_context());
}

#[test]
fn reused_context_is_empty_after_handler_error() {
    let ctx = Arc::new(TenantContext::new());

    let handler = |ctx: &Arc<TenantContext>| -> std::result::Result<(), PortalError> {
        let _scope = ctx.enter(Some(acme()));
        Err(PortalError::Internal("handler failed".into()))
    };
    assert!(handler(&ctx).is_err());

    // next request on the same slot starts clean
    assert!(!ctx.has_context());
}

#[test]
fn reused_context_is_empty_after_handler_panic() {
    let ctx = Arc::new(TenantContext::new());

    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        let _scope = ctx.enter(Some(acme()));
        panic!("handler blew up");
    }));
    assert!(caught.is_err());
    assert!(!ctx.has_context());
}

#[test]
fn normalize_host_strips_port_and_case() {
    assert_eq!(normalize_host("ACME.example.com:8443").as_deref(), Some("acme.example.com"));
    assert_eq!(normalize_host("acme.example.com.").as_deref(), Some("acme.example.com"));
    assert_eq!(normalize_host("[::1]:8080").as_deref(), Some("::1"));
    assert_eq!(normalize_host("   "), None);
}

#[tokio::test]
async fn subdomain_resolves_during_request_and_clears_after() {
    let (resolver, _) = resolver();
    let worker_slot = Arc::new(TenantContext::new());

    {
        let _scope = resolver.enter(&worker_slot, Some("acme.example.com")).await;
        assert_eq!(worker_slot.project_id().as_deref(), Some("proj_acme"));
        assert_eq!(worker_slot.subdomain().as_deref(), Some("acme"));
    }

    assert_eq!(worker_slot.project_id(), None);
    assert!(!worker_slot.has_context());
}

#[tokio::test]
async fn custom_domain_resolves() {
    let (resolver, _) = resolver();
    let t = resolver.resolve(Some("portal.acme.io:443")).await.expect("tenant");
    assert_eq!(t.id, "proj_acme");
}

#[tokio::test]
async fn unmapped_hosts_have_no_context() {
    let (resolver, metrics) = resolver();
    let slot = Arc::new(TenantContext::new());

    for host in [
        "example.com",
        "www.example.com",
        "app.example.com",
        "unknown.example.com",
        "deep.acme.example.com",
        "acme.other.org",
        "notexample.com",
        "",
    ] {
        let _scope = resolver.enter(&slot, Some(host)).await;
        assert!(!slot.has_context(), "host {host:?} must not resolve");
    }

    let _scope = resolver.enter(&slot, None).await;
    assert!(!slot.has_context());
    assert!(metrics.tenant_resolutions.get(&[("outcome", "unmapped")]) >= 6);
}

#[tokio::test]
async fn failed_lookup_clears_stale_binding() {
    let metrics = Arc::new(PortalMetrics::default());
    let resolver = TenantResolver::new(Arc::new(FailingDirectory), Arc::clone(&metrics));
    let slot = Arc::new(TenantContext::new());

    // A binding that somehow survived must not leak into this request.
    let stale = slot.enter(Some(acme()));
    std::mem::forget(stale);
    assert!(slot.has_context());

    let _scope = resolver.enter(&slot, Some("acme.example.com")).await;
    assert!(!slot.has_context());
    assert_eq!(metrics.tenant_resolutions.get(&[("outcome", "error")]), 1);
}

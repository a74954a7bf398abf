#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use portalguard_core::model::Role;
use portalguard_gateway::config::IdentitySection;
use portalguard_gateway::context::RequestContext;
use portalguard_gateway::directory::StaticUserDirectory;
use portalguard_gateway::identity::{
    bearer_token, issue_token, IdentityOutcome, IdentityResolver, RejectReason,
};
use portalguard_gateway::obs::PortalMetrics;

fn setup() -> (IdentityResolver, IdentitySection, Arc<PortalMetrics>) {
    let cfg = common::config();
    let metrics = Arc::new(PortalMetrics::default());
    let users = Arc::new(StaticUserDirectory::from_config(&cfg));
    let resolver = IdentityResolver::new(&cfg.identity, users, Arc::clone(&metrics));
    (resolver, cfg.identity, metrics)
}

#[test]
fn bearer_header_parsing() {
    assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
    assert_eq!(bearer_token(Some("bearer   abc")), Some("abc"));
    assert_eq!(bearer_token(Some("Basic abc")), None);
    assert_eq!(bearer_token(Some("Bearer ")), None);
    assert_eq!(bearer_token(Some("Bearer")), None);
    assert_eq!(bearer_token(None), None);
}

#[tokio::test]
async fn no_credential_is_anonymous() {
    let (resolver, _, _) = setup();
    let ctx = RequestContext::new();
    assert_eq!(resolver.attach(&ctx, None).await, IdentityOutcome::Anonymous);
    assert!(ctx.principal().is_none());
}

#[tokio::test]
async fn valid_token_attaches_principal() {
    let (resolver, identity, metrics) = setup();
    let token = issue_token(&identity, "Alice@Acme.io", 600).unwrap();
    let ctx = RequestContext::new();

    assert_eq!(resolver.attach(&ctx, Some(&token)).await, IdentityOutcome::Attached);
    let p = ctx.principal().expect("principal");
    assert_eq!(p.user_id, "usr_alice");
    assert_eq!(p.role, Role::Owner);
    assert_eq!(metrics.identity_outcomes.get(&[("outcome", "attached")]), 1);
}

#[tokio::test]
async fn second_resolution_is_skipped() {
    let (resolver, identity, _) = setup();
    let alice = issue_token(&identity, "alice@acme.io", 600).unwrap();
    let victor = issue_token(&identity, "victor@acme.io", 600).unwrap();
    let ctx = RequestContext::new();

    resolver.attach(&ctx, Some(&alice)).await;
    assert_eq!(
        resolver.attach(&ctx, Some(&victor)).await,
        IdentityOutcome::AlreadyAttached
    );
    assert_eq!(ctx.principal().unwrap().user_id, "usr_alice");
}

#[tokio::test]
async fn expired_token_leaves_request_anonymous() {
    let (resolver, identity, _) = setup();
    let token = issue_token(&identity, "alice@acme.io", -3600).unwrap();
    let ctx = RequestContext::new();

    assert_eq!(
        resolver.attach(&ctx, Some(&token)).await,
        IdentityOutcome::Rejected(RejectReason::Expired)
    );
    assert!(ctx.principal().is_none());
}

#[tokio::test]
async fn wrong_signature_or_garbage_is_rejected() {
    let (resolver, _, _) = setup();
    let other = IdentitySection {
        jwt_secret: "another-secret-0123456789".into(),
        issuer: Some("portalguard".into()),
        leeway_secs: 0,
    };
    let forged = issue_token(&other, "alice@acme.io", 600).unwrap();
    let ctx = RequestContext::new();

    assert_eq!(
        resolver.attach(&ctx, Some(&forged)).await,
        IdentityOutcome::Rejected(RejectReason::InvalidToken)
    );
    assert_eq!(
        resolver.attach(&ctx, Some("not-a-jwt")).await,
        IdentityOutcome::Rejected(RejectReason::InvalidToken)
    );
    assert!(ctx.principal().is_none());
}

#[tokio::test]
async fn wrong_issuer_is_rejected() {
    let (resolver, identity, _) = setup();
    let other = IdentitySection {
        jwt_secret: identity.jwt_secret.clone(),
        issuer: Some("someone-else".into()),
        leeway_secs: 0,
    };
    let token = issue_token(&other, "alice@acme.io", 600).unwrap();
    let ctx = RequestContext::new();
    assert_eq!(
        resolver.attach(&ctx, Some(&token)).await,
        IdentityOutcome::Rejected(RejectReason::InvalidToken)
    );
}

#[tokio::test]
async fn unknown_subject_is_rejected() {
    let (resolver, identity, _) = setup();
    let token = issue_token(&identity, "mallory@evil.io", 600).unwrap();
    let ctx = RequestContext::new();
    assert_eq!(
        resolver.attach(&ctx, Some(&token)).await,
        IdentityOutcome::Rejected(RejectReason::UnknownSubject)
    );
    assert!(ctx.principal().is_none());
}

//! Identity resolution: bearer credential -> principal.
//!
//! This layer never rejects a request. A missing, malformed, expired or
//! unknown credential simply leaves the request anonymous; protected
//! operations are denied later by the dispatcher.

pub mod token;

use std::sync::Arc;

use crate::config::IdentitySection;
use crate::context::RequestContext;
use crate::directory::UserDirectory;
use crate::obs::PortalMetrics;

pub use token::{bearer_token, issue_token, Claims};

use token::TokenVerifier;

/// Why a presented credential did not produce a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidToken,
    Expired,
    UnknownSubject,
    DirectoryError,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::InvalidToken => "invalid_token",
            RejectReason::Expired => "expired",
            RejectReason::UnknownSubject => "unknown_subject",
            RejectReason::DirectoryError => "directory_error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityOutcome {
    Attached,
    AlreadyAttached,
    Anonymous,
    Rejected(RejectReason),
}

impl IdentityOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityOutcome::Attached => "attached",
            IdentityOutcome::AlreadyAttached => "already_attached",
            IdentityOutcome::Anonymous => "anonymous",
            IdentityOutcome::Rejected(r) => r.as_str(),
        }
    }
}

pub struct IdentityResolver {
    users: Arc<dyn UserDirectory>,
    verifier: TokenVerifier,
    metrics: Arc<PortalMetrics>,
}

impl IdentityResolver {
    pub fn new(cfg: &IdentitySection, users: Arc<dyn UserDirectory>, metrics: Arc<PortalMetrics>) -> Self {
        Self {
            users,
            verifier: TokenVerifier::new(cfg),
            metrics,
        }
    }

    /// Resolve `credential` and attach the principal to `ctx`.
    pub async fn attach(&self, ctx: &RequestContext, credential: Option<&str>) -> IdentityOutcome {
        let outcome = self.resolve_into(ctx, credential).await;
        self.metrics
            .identity_outcomes
            .inc(&[("outcome", outcome.as_str())]);
        outcome
    }

    async fn resolve_into(&self, ctx: &RequestContext, credential: Option<&str>) -> IdentityOutcome {
        if ctx.has_principal() {
            return IdentityOutcome::AlreadyAttached;
        }
        let Some(token) = credential else {
            return IdentityOutcome::Anonymous;
        };

        let claims = match self.verifier.verify(token) {
            Ok(c) => c,
            Err(e) => {
                let reason = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => RejectReason::Expired,
                    _ => RejectReason::InvalidToken,
                };
                tracing::debug!(request_id=%ctx.request_id(), error=%e, "bearer token rejected");
                return IdentityOutcome::Rejected(reason);
            }
        };

        match self.users.get_user_by_email(&claims.sub).await {
            Ok(Some(principal)) => {
                tracing::debug!(request_id=%ctx.request_id(), user=%principal.user_id, "principal attached");
                if ctx.attach_principal(principal) {
                    IdentityOutcome::Attached
                } else {
                    IdentityOutcome::AlreadyAttached
                }
            }
            Ok(None) => {
                tracing::debug!(request_id=%ctx.request_id(), subject=%claims.sub, "token subject not found");
                IdentityOutcome::Rejected(RejectReason::UnknownSubject)
            }
            Err(e) => {
                tracing::warn!(request_id=%ctx.request_id(), error=%e, "user directory lookup failed");
                IdentityOutcome::Rejected(RejectReason::DirectoryError)
            }
        }
    }
}

//! The audit wrapper.
//!
//! `intercept` runs an operation future, then builds and submits exactly one
//! record for it. The operation's result, error or panic is handed back to
//! the caller untouched; audit problems only ever produce a log line.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use serde::Serialize;
use uuid::Uuid;

use portalguard_core::error::Result;
use portalguard_core::model::{AuditRecord, AuditStatus};

use crate::context::RequestContext;
use crate::directory::SessionDirectory;
use crate::obs::PortalMetrics;

use super::args::CallArgs;
use super::extract::{self, Observation, Outcome, RecordParts, SkipReason};
use super::spec::{AuditScope, AuditSpec};
use super::store::AuditQueue;

pub struct AuditInterceptor {
    queue: AuditQueue,
    sessions: Arc<dyn SessionDirectory>,
    separator: String,
    metrics: Arc<PortalMetrics>,
}

impl AuditInterceptor {
    pub fn new(
        queue: AuditQueue,
        sessions: Arc<dyn SessionDirectory>,
        separator: impl Into<String>,
        metrics: Arc<PortalMetrics>,
    ) -> Self {
        Self {
            queue,
            sessions,
            separator: separator.into(),
            metrics,
        }
    }

    pub fn queue(&self) -> &AuditQueue {
        &self.queue
    }

    /// Run `call` under `spec` and record its outcome.
    pub async fn intercept<T, Fut>(
        &self,
        spec: &AuditSpec,
        ctx: &RequestContext,
        operation: &str,
        args: &CallArgs,
        call: Fut,
    ) -> Result<T>
    where
        T: Serialize,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let caught = AssertUnwindSafe(call).catch_unwind().await;
        let elapsed = started.elapsed();

        match caught {
            Ok(result) => {
                let outcome = match &result {
                    Ok(v) => Outcome::Completed(render_result(operation, v)),
                    Err(e) => Outcome::Failed(e.to_string()),
                };
                self.observe_guarded(spec, ctx, operation, args, &outcome, elapsed).await;
                result
            }
            Err(panic) => {
                let outcome = Outcome::Failed(panic_message(panic.as_ref()));
                self.observe_guarded(spec, ctx, operation, args, &outcome, elapsed).await;
                std::panic::resume_unwind(panic)
            }
        }
    }

    /// `observe`, with any panic raised by a collaborator or extractor
    /// contained here so the operation's own outcome reaches the caller.
    async fn observe_guarded(
        &self,
        spec: &AuditSpec,
        ctx: &RequestContext,
        operation: &str,
        args: &CallArgs,
        outcome: &Outcome,
        elapsed: Duration,
    ) {
        let observed = AssertUnwindSafe(self.observe(spec, ctx, operation, args, outcome, elapsed))
            .catch_unwind()
            .await;
        if let Err(panic) = observed {
            tracing::warn!(
                request_id=%ctx.request_id(),
                %operation,
                scope=%spec.scope.level(),
                reason=%panic_message(panic.as_ref()),
                "audit record skipped"
            );
            self.metrics.audit_skipped.inc(&[("reason", "panic")]);
        }
    }

    async fn observe(
        &self,
        spec: &AuditSpec,
        ctx: &RequestContext,
        operation: &str,
        args: &CallArgs,
        outcome: &Outcome,
        elapsed: Duration,
    ) {
        if outcome.is_failure() && !spec.audit_on_failure {
            tracing::debug!(%operation, "failure not audited (audit_on_failure=false)");
            return;
        }

        let obs = Observation {
            spec,
            operation,
            args,
            principal: ctx.principal(),
            outcome,
            elapsed,
        };

        match self.extract(&obs).await {
            Ok(parts) => {
                let record = build_record(spec, &obs, parts);
                self.metrics.audit_records.inc(&[
                    ("status", record.status.as_str()),
                    ("scope", spec.scope.level()),
                ]);
                self.queue.submit(record);
            }
            Err(reason) => {
                tracing::warn!(
                    request_id=%ctx.request_id(),
                    %operation,
                    scope=%spec.scope.level(),
                    %reason,
                    "audit record skipped"
                );
                self.metrics.audit_skipped.inc(&[("reason", reason.as_str())]);
            }
        }
    }

    async fn extract(&self, obs: &Observation<'_>) -> std::result::Result<RecordParts, SkipReason> {
        match &obs.spec.scope {
            AuditScope::Org => extract::org(obs, &self.separator),
            AuditScope::Workspace { workspace_id_param } => extract::workspace(obs, workspace_id_param),
            AuditScope::VmSession {
                session_id_param,
                include_session_details,
                include_metrics,
            } => {
                let session_id = extract::session_id(obs.args, session_id_param)?;
                let session = self
                    .sessions
                    .get_session(&session_id)
                    .await
                    .map_err(|e| SkipReason::SessionLookup(e.to_string()))?
                    .ok_or(SkipReason::SessionNotFound(session_id))?;
                Ok(extract::vm_session(obs, &session, *include_session_details, *include_metrics))
            }
        }
    }
}

fn build_record(spec: &AuditSpec, obs: &Observation<'_>, parts: RecordParts) -> AuditRecord {
    let status = if obs.outcome.is_failure() {
        AuditStatus::Failed
    } else {
        AuditStatus::Success
    };
    AuditRecord {
        id: Uuid::new_v4(),
        actor_id: parts.actor_id,
        actor_name: parts.actor_name,
        scope_id: parts.scope_id,
        action: spec.action.clone(),
        resource_type: spec.resource_type.clone(),
        resource_id: parts.resource_id,
        details: parts.details,
        status,
        error_message: obs.outcome.error_message().map(str::to_string),
        duration_ms: obs.duration_ms(),
        timestamp: chrono::Utc::now(),
    }
}

fn render_result<T: Serialize>(operation: &str, v: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(v) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(%operation, error=%e, "result not representable as json");
            None
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}

//! Scope-specific extraction of audit record parts.
//!
//! Each function is pure: it sees the spec, the named arguments, the outcome
//! and the elapsed time, and either produces the variable parts of a record
//! or a `SkipReason`. Nothing here can fail the audited operation.

use std::time::Duration;

use serde_json::{json, Map, Value};
use thiserror::Error;

use portalguard_core::model::{Principal, Session};

use super::args::{value_as_id, CallArgs};
use super::spec::AuditSpec;

pub const SYSTEM_ACTOR_ID: &str = "system";
pub const SYSTEM_ACTOR_NAME: &str = "System";

/// Why no record was produced for an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no principal attached to the request")]
    NoPrincipal,
    #[error("argument `{0}` missing or not an identifier")]
    MissingParam(String),
    #[error("session {0} not found")]
    SessionNotFound(String),
    #[error("session lookup failed: {0}")]
    SessionLookup(String),
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoPrincipal => "no_principal",
            SkipReason::MissingParam(_) => "missing_param",
            SkipReason::SessionNotFound(_) => "session_not_found",
            SkipReason::SessionLookup(_) => "session_lookup",
        }
    }
}

/// Outcome of the wrapped operation as seen by the auditor.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Completed; the result, if it could be rendered as JSON.
    Completed(Option<Value>),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Failed(m) => Some(m),
            Outcome::Completed(_) => None,
        }
    }

    fn result(&self) -> Option<&Value> {
        match self {
            Outcome::Completed(v) => v.as_ref(),
            Outcome::Failed(_) => None,
        }
    }
}

/// Everything an extractor may look at.
pub struct Observation<'a> {
    pub spec: &'a AuditSpec,
    pub operation: &'a str,
    pub args: &'a CallArgs,
    pub principal: Option<&'a Principal>,
    pub outcome: &'a Outcome,
    pub elapsed: Duration,
}

impl Observation<'_> {
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Variable parts of an audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordParts {
    pub actor_id: String,
    pub actor_name: String,
    pub scope_id: Option<String>,
    pub resource_id: Option<String>,
    pub details: Value,
}

pub fn org(obs: &Observation<'_>, separator: &str) -> Result<RecordParts, SkipReason> {
    let principal = obs.principal.ok_or(SkipReason::NoPrincipal)?;
    let resource_id = obs
        .outcome
        .result()
        .and_then(result_id)
        .or_else(|| composite_id_arg(obs.args, separator));

    Ok(RecordParts {
        actor_id: principal.user_id.clone(),
        actor_name: principal.display_name.clone(),
        scope_id: Some(principal.organization_id.clone()),
        resource_id,
        details: Value::Object(base_details(obs)),
    })
}

pub fn workspace(obs: &Observation<'_>, workspace_id_param: &str) -> Result<RecordParts, SkipReason> {
    let principal = obs.principal.ok_or(SkipReason::NoPrincipal)?;
    let workspace_id = obs
        .args
        .get_id(workspace_id_param)
        .ok_or_else(|| SkipReason::MissingParam(workspace_id_param.to_string()))?;

    Ok(RecordParts {
        actor_id: principal.user_id.clone(),
        actor_name: principal.display_name.clone(),
        scope_id: Some(workspace_id.clone()),
        resource_id: Some(workspace_id),
        details: Value::Object(base_details(obs)),
    })
}

/// Session id argument for a VM session scope.
pub fn session_id(args: &CallArgs, session_id_param: &str) -> Result<String, SkipReason> {
    args.get_id(session_id_param)
        .ok_or_else(|| SkipReason::MissingParam(session_id_param.to_string()))
}

pub fn vm_session(
    obs: &Observation<'_>,
    session: &Session,
    include_session_details: bool,
    include_metrics: bool,
) -> RecordParts {
    let mut details = base_details(obs);
    if include_session_details {
        details.insert("status".into(), json!(session.status));
        details.insert("vmInstanceId".into(), json!(session.vm_instance_id));
        details.insert("projectId".into(), json!(session.project_id));
        details.insert("connectionUrl".into(), json!(session.connection_url));
    }
    if include_metrics {
        details.insert("durationSeconds".into(), json!(session.duration_seconds));
        details.insert("creditsUsed".into(), json!(session.credits_used));
        details.insert("heartbeatCount".into(), json!(session.heartbeat_count));
    }

    let (actor_id, actor_name) = match obs.principal {
        Some(p) => (p.user_id.clone(), p.display_name.clone()),
        None => (SYSTEM_ACTOR_ID.to_string(), SYSTEM_ACTOR_NAME.to_string()),
    };

    RecordParts {
        actor_id,
        actor_name,
        scope_id: Some(session.project_id.clone()),
        resource_id: Some(session.id.clone()),
        details: Value::Object(details),
    }
}

fn base_details(obs: &Observation<'_>) -> Map<String, Value> {
    let mut d = Map::new();
    d.insert("operation".into(), json!(obs.operation));
    d.insert("durationMs".into(), json!(obs.duration_ms()));
    if !obs.spec.description.is_empty() {
        d.insert("description".into(), json!(obs.spec.description));
    }
    if let Some(err) = obs.outcome.error_message() {
        d.insert("error".into(), json!(err));
    }
    if obs.spec.include_request_params {
        d.insert("requestParams".into(), obs.args.to_json());
    }
    if obs.spec.include_response {
        if let Some(v) = obs.outcome.result() {
            d.insert("response".into(), v.clone());
        }
    }
    d
}

/// `id` accessor on the operation result.
fn result_id(v: &Value) -> Option<String> {
    v.get("id").and_then(value_as_id)
}

/// First string argument shaped like a composite identifier (`org_42`).
fn composite_id_arg(args: &CallArgs, separator: &str) -> Option<String> {
    args.values()
        .filter_map(Value::as_str)
        .find(|s| s.contains(separator))
        .map(str::to_string)
}

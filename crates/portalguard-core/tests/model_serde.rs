#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use portalguard_core::error::{ClientCode, PortalError};
use portalguard_core::model::{AuditRecord, AuditStatus, Principal, Role, Session};

#[test]
fn principal_uses_camel_case_and_lowercase_role() {
    let p = Principal {
        user_id: "usr_1".into(),
        email: "a@b.io".into(),
        display_name: "A".into(),
        organization_id: "org_1".into(),
        role: Role::Admin,
    };
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["userId"], "usr_1");
    assert_eq!(v["organizationId"], "org_1");
    assert_eq!(v["role"], "admin");
}

#[test]
fn session_metrics_default_to_zero() {
    let s: Session = serde_json::from_value(json!({
        "id": "sess_1",
        "status": "STARTING",
        "vmInstanceId": "vm_1",
        "projectId": "proj_1"
    }))
    .unwrap();
    assert_eq!(s.connection_url, None);
    assert_eq!(s.duration_seconds, 0);
    assert_eq!(s.credits_used, 0.0);
    assert_eq!(s.heartbeat_count, 0);
}

#[test]
fn audit_record_wire_shape() {
    let rec = AuditRecord {
        id: Uuid::nil(),
        actor_id: "usr_1".into(),
        actor_name: "A".into(),
        scope_id: Some("ws_1".into()),
        action: "workspace.update".into(),
        resource_type: "workspace".into(),
        resource_id: Some("ws_1".into()),
        details: json!({"operation": "workspace.update"}),
        status: AuditStatus::Failed,
        error_message: Some("internal: boom".into()),
        duration_ms: 7,
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    };
    assert!(rec.is_failure());

    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["status"], "FAILED");
    assert_eq!(v["scopeId"], "ws_1");
    assert_eq!(v["errorMessage"], "internal: boom");
    assert_eq!(v["durationMs"], 7);
    assert_eq!(v["timestamp"], "2024-05-01T12:00:00Z");
}

#[test]
fn error_client_codes() {
    let cases = [
        (PortalError::BadRequest("x".into()), ClientCode::BadRequest, "BAD_REQUEST"),
        (PortalError::AuthRequired, ClientCode::AuthRequired, "AUTH_REQUIRED"),
        (PortalError::NotAllowed("x".into()), ClientCode::NotAllowed, "NOT_ALLOWED"),
        (PortalError::NotFound("x".into()), ClientCode::NotFound, "NOT_FOUND"),
        (PortalError::Unavailable("x".into()), ClientCode::Unavailable, "UNAVAILABLE"),
        (PortalError::Internal("x".into()), ClientCode::Internal, "INTERNAL"),
    ];
    for (err, code, s) in cases {
        assert_eq!(err.client_code(), code);
        assert_eq!(code.as_str(), s);
    }
}

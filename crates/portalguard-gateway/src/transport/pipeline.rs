//! Per-request security pipeline (axum middleware).
//!
//! Order:
//! 1. fresh `RequestContext`
//! 2. identity: bearer credential -> principal (never rejects)
//! 3. tenancy: `Host` -> tenant context, held by a `TenantScope`
//! 4. handler runs with the context in request extensions
//! 5. the scope drops when this function returns or unwinds, clearing the
//!    tenant context on every path

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, HOST},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::app_state::AppState;
use crate::context::RequestContext;
use crate::identity::bearer_token;

pub async fn request_pipeline(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = Arc::new(RequestContext::new());

    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let identity = app
        .identity()
        .attach(&ctx, bearer_token(authorization.as_deref()))
        .await;

    let host = request_host(&req);
    let scope = app.tenants().enter(ctx.tenant(), host.as_deref()).await;

    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id(),
        method = %req.method(),
        path = %req.uri().path(),
        host = host.as_deref().unwrap_or("-"),
        tenant = scope.context().project_id().as_deref().unwrap_or("-"),
        identity = identity.as_str(),
    );

    req.extensions_mut().insert(Arc::clone(&ctx));
    let response = next.run(req).instrument(span).await;

    app.metrics()
        .http_requests
        .inc(&[("status", response.status().as_str())]);
    drop(scope);
    response
}

fn request_host(req: &Request) -> Option<String> {
    req.headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().host().map(str::to_string))
}

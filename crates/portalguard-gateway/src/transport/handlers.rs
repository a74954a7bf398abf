use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use portalguard_core::error::PortalError;

use crate::app_state::AppState;
use crate::audit::CallArgs;
use crate::context::RequestContext;
use crate::services::context::describe;

use super::error::ApiError;

/// `POST /v1/ops/:name` with a JSON object of named arguments.
/// An empty body means no arguments; anything else must parse as JSON.
pub async fn dispatch_op(
    State(app): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let args = CallArgs::from_json(parse_body(&body)?)?;
    let out = app.dispatcher().dispatch(&ctx, &name, args).await?;
    Ok(Json(out))
}

/// `GET /v1/context`
pub async fn describe_context(Extension(ctx): Extension<Arc<RequestContext>>) -> Json<Value> {
    Json(describe(&ctx))
}

fn parse_body(body: &[u8]) -> Result<Value, PortalError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| PortalError::BadRequest(format!("invalid JSON body: {e}")))
}

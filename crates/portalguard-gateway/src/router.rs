//! Axum router wiring.
//!
//! API routes sit behind the request pipeline; ops endpoints do not.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ops/:name", post(transport::handlers::dispatch_op))
        .route("/v1/context", get(transport::handlers::describe_context))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            transport::pipeline::request_pipeline,
        ))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}

//! portalguard gateway
//!
//! - HTTP API: /v1/ops/:name, /v1/context (behind the request pipeline)
//! - Ops: /healthz, /readyz, /metrics
//! - Config: $PORTALGUARD_CONFIG (default portalguard.yaml)

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use portalguard_core::error::{PortalError, Result};
use portalguard_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| PortalError::BadRequest(format!("gateway.listen: {e}")))?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config=%path, "portalguard-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| PortalError::Internal(format!("bind {listen} failed: {e}")))?;

    let drain = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested; draining");
            drain.set_draining();
        })
        .await
        .map_err(|e| PortalError::Internal(format!("server failed: {e}")))?;

    state.flush_audit().await;
    tracing::info!("portalguard-gateway stopped");
    Ok(())
}

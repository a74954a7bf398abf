//! Tenant resolution: inbound host -> tenant context.
//!
//! Resolution failure is never fatal. An unmapped host, a main-portal host or
//! a directory error all leave the request tenant-less, with any previous
//! binding explicitly cleared.

use std::sync::Arc;

use portalguard_core::model::Tenant;

use crate::context::{TenantBinding, TenantContext, TenantScope};
use crate::directory::TenantDirectory;
use crate::obs::PortalMetrics;

pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    metrics: Arc<PortalMetrics>,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, metrics: Arc<PortalMetrics>) -> Self {
        Self { directory, metrics }
    }

    /// Look up the tenant for a raw `Host` value. Errors are logged and
    /// reported as `None`.
    pub async fn resolve(&self, raw_host: Option<&str>) -> Option<Tenant> {
        let Some(host) = raw_host.and_then(normalize_host) else {
            self.metrics.tenant_resolutions.inc(&[("outcome", "absent")]);
            return None;
        };

        match self.directory.resolve_tenant(&host).await {
            Ok(Some(t)) => {
                self.metrics.tenant_resolutions.inc(&[("outcome", "resolved")]);
                Some(t)
            }
            Ok(None) => {
                self.metrics.tenant_resolutions.inc(&[("outcome", "unmapped")]);
                None
            }
            Err(e) => {
                tracing::warn!(%host, error=%e, "tenant lookup failed; continuing without tenant");
                self.metrics.tenant_resolutions.inc(&[("outcome", "error")]);
                None
            }
        }
    }

    /// Resolve `raw_host` and bind the result to `ctx` for the lifetime of the
    /// returned scope.
    pub async fn enter(&self, ctx: &Arc<TenantContext>, raw_host: Option<&str>) -> TenantScope {
        // Nothing from an earlier request may survive a failed lookup.
        ctx.clear();
        let binding = self.resolve(raw_host).await.as_ref().map(TenantBinding::from);
        let scope = ctx.enter(binding);
        tracing::debug!(tenant=%scope.context().summary(), "tenant context entered");
        scope
    }
}

/// Lowercase, drop the port and any trailing dot. Empty hosts yield `None`.
pub fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let host = if let Some(rest) = raw.strip_prefix('[') {
        // [v6]:port
        rest.split_once(']').map(|(h, _)| h).unwrap_or(rest)
    } else {
        match raw.rsplit_once(':') {
            Some((h, port)) if port.chars().all(|c| c.is_ascii_digit()) => h,
            _ => raw,
        }
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}

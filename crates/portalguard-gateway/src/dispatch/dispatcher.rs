use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use portalguard_core::error::{PortalError, Result};

use crate::audit::{AuditInterceptor, AuditSpec, CallArgs};
use crate::context::RequestContext;
use crate::obs::PortalMetrics;
use crate::policy::PermissionEvaluator;

/// A named portal operation.
#[async_trait]
pub trait Operation: Send + Sync {
    fn name(&self) -> &'static str;

    /// (resource type, action verb) the caller must hold, if any.
    fn required_permission(&self) -> Option<(&'static str, &'static str)> {
        None
    }

    async fn invoke(&self, ctx: &RequestContext, args: &CallArgs) -> Result<Value>;
}

/// Decorator adding audit capture to an operation. The wrapped operation
/// itself contains no audit code.
pub struct Audited<O> {
    inner: O,
    spec: AuditSpec,
    interceptor: Arc<AuditInterceptor>,
}

impl<O: Operation> Audited<O> {
    pub fn new(inner: O, spec: AuditSpec, interceptor: Arc<AuditInterceptor>) -> Self {
        Self {
            inner,
            spec,
            interceptor,
        }
    }
}

#[async_trait]
impl<O: Operation> Operation for Audited<O> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn required_permission(&self) -> Option<(&'static str, &'static str)> {
        self.inner.required_permission()
    }

    async fn invoke(&self, ctx: &RequestContext, args: &CallArgs) -> Result<Value> {
        self.interceptor
            .intercept(&self.spec, ctx, self.inner.name(), args, self.inner.invoke(ctx, args))
            .await
    }
}

/// Registry and dispatcher for named operations.
pub struct Dispatcher {
    ops: DashMap<&'static str, Arc<dyn Operation>>,
    evaluator: Arc<PermissionEvaluator>,
    interceptor: Arc<AuditInterceptor>,
    metrics: Arc<PortalMetrics>,
}

impl Dispatcher {
    pub fn new(
        evaluator: Arc<PermissionEvaluator>,
        interceptor: Arc<AuditInterceptor>,
        metrics: Arc<PortalMetrics>,
    ) -> Self {
        Self {
            ops: DashMap::new(),
            evaluator,
            interceptor,
            metrics,
        }
    }

    pub fn register(&self, op: Arc<dyn Operation>) {
        self.ops.insert(op.name(), op);
    }

    /// Register `op` wrapped in the audit decorator for `spec`.
    pub fn register_audited<O: Operation + 'static>(&self, op: O, spec: AuditSpec) {
        let audited = Audited::new(op, spec, Arc::clone(&self.interceptor));
        self.register(Arc::new(audited));
    }

    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.ops.iter().map(|e| *e.key()).collect();
        names.sort_unstable();
        names
    }

    pub fn required_permission(&self, name: &str) -> Option<(&'static str, &'static str)> {
        self.ops.get(name).and_then(|op| op.required_permission())
    }

    pub async fn dispatch(&self, ctx: &RequestContext, name: &str, args: CallArgs) -> Result<Value> {
        let op = self
            .ops
            .get(name)
            .ok_or_else(|| PortalError::NotFound(format!("unknown operation: {name}")))?
            .value()
            .clone();

        if let Some((resource, action)) = op.required_permission() {
            if let Err(e) = self.evaluator.authorize(ctx, resource, action) {
                self.metrics
                    .operation_errors
                    .inc(&[("op", op.name()), ("code", e.client_code().as_str())]);
                return Err(e);
            }
        }

        let started = Instant::now();
        let result = op.invoke(ctx, &args).await;
        self.metrics
            .operation_duration
            .observe(&[("op", op.name())], started.elapsed());
        if let Err(e) = &result {
            self.metrics
                .operation_errors
                .inc(&[("op", op.name()), ("code", e.client_code().as_str())]);
        }
        result
    }
}

//! Declarative audit capture.
//!
//! An operation opts in by being registered with an [`AuditSpec`]. The
//! [`AuditInterceptor`] wraps the call, dispatches on the spec's scope
//! (organization, workspace or VM session), and submits one
//! [`AuditRecord`](portalguard_core::model::AuditRecord) per invocation to
//! the background [`AuditQueue`].

pub mod args;
pub mod extract;
pub mod interceptor;
pub mod spec;
pub mod store;

pub use args::CallArgs;
pub use extract::{Outcome, SkipReason};
pub use interceptor::AuditInterceptor;
pub use spec::{AuditScope, AuditSpec};
pub use store::{AuditQueue, MemoryAuditStore, TracingAuditStore};

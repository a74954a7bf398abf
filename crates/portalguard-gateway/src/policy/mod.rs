//! Policy layer (permission table, role grants, evaluation).
//!
//! Compiles role grant configuration into lookup structures and answers
//! allow/deny for a (role, resource, action) triple.

pub mod allowlist;
pub mod engine;

pub use allowlist::StaticRoleMembership;
pub use engine::{Decision, PermissionEvaluator};

//! Dispatcher module exports.
//!
//! Re-exports the dispatcher, the operation trait and the audit decorator so
//! downstream consumers can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{Audited, Dispatcher, Operation};

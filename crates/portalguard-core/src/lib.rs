//! portalguard core: transport-agnostic domain types and the shared error type.
//!
//! This crate defines the identities, tenants, sessions, permissions and audit
//! records that the request pipeline passes around. It intentionally carries no
//! transport or runtime dependencies so directories and stores can be
//! implemented against it without pulling in the gateway.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `PortalError`/`Result`; lookups over
//! unrecognized input degrade to `None` instead of failing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{PortalError, Result};

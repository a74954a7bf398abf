//! Top-level facade crate for portalguard.
//!
//! Re-exports the domain types and the gateway pipeline so users can depend
//! on a single crate.

pub mod core {
    pub use portalguard_core::*;
}

pub mod gateway {
    pub use portalguard_gateway::*;
}

//! portalguard gateway library entry.
//!
//! This crate wires identity resolution, tenant resolution, permission
//! evaluation and declarative audit capture into an axum request pipeline.
//! It is intended to be consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod audit;
pub mod config;
pub mod context;
pub mod directory;
pub mod dispatch;
pub mod identity;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod services;
pub mod tenancy;
pub mod transport;

//! Transport layer (HTTP).
//!
//! Exposes the request pipeline middleware, the JSON handlers and the HTTP
//! error mapping.

pub mod error;
pub mod handlers;
pub mod pipeline;

pub use error::ApiError;

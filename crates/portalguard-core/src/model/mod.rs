//! Domain model shared by the pipeline and its collaborators.
//!
//! - Identity: `Principal` + `Role`
//! - Tenancy: `Tenant`
//! - VM sessions: `Session`
//! - Authorization: `Permission` and its static (resource, action) table
//! - Audit: `AuditRecord` + `AuditStatus`

pub mod audit;
pub mod permission;
pub mod principal;
pub mod session;
pub mod tenant;

pub use audit::{AuditRecord, AuditStatus};
pub use permission::Permission;
pub use principal::{Principal, Role};
pub use session::Session;
pub use tenant::Tenant;

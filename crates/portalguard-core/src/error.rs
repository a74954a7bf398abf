//! Shared error type across portalguard crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// No principal attached to a request that needs one.
    AuthRequired,
    /// Principal lacks the permission for the action.
    NotAllowed,
    /// Referenced entity or operation does not exist.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// A collaborator could not be reached.
    Unavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthRequired => "AUTH_REQUIRED",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PortalError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortalError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("authentication required")]
    AuthRequired,
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PortalError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PortalError::BadRequest(_) => ClientCode::BadRequest,
            PortalError::AuthRequired => ClientCode::AuthRequired,
            PortalError::NotAllowed(_) => ClientCode::NotAllowed,
            PortalError::NotFound(_) => ClientCode::NotFound,
            PortalError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PortalError::Unavailable(_) => ClientCode::Unavailable,
            PortalError::Internal(_) => ClientCode::Internal,
        }
    }
}

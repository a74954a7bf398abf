//! Bearer token format (HS256 JWT).

use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use portalguard_core::error::{PortalError, Result};

use crate::config::IdentitySection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject email, resolved through the user directory.
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

pub(crate) struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub(crate) fn new(cfg: &IdentitySection) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = cfg.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(&[iss]);
        }
        Self {
            key: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub(crate) fn verify(&self, token: &str) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation).map(|d| d.claims)
    }
}

/// Issue a token for `email` valid for `ttl_secs`. Used by dev tooling and tests.
pub fn issue_token(cfg: &IdentitySection, email: &str, ttl_secs: i64) -> Result<String> {
    let now = chrono::Utc::now();
    let exp = now
        .checked_add_signed(chrono::Duration::seconds(ttl_secs))
        .ok_or_else(|| PortalError::Internal("token expiry overflow".into()))?;

    let claims = Claims {
        sub: email.to_string(),
        exp: usize::try_from(exp.timestamp()).unwrap_or(0),
        iat: usize::try_from(now.timestamp()).unwrap_or(0),
        iss: cfg.issuer.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| PortalError::Internal(format!("token encode failed: {e}")))
}

/// Extract the credential from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

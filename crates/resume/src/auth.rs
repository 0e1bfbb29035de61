//! Bearer credential parsing.
//!
//! The user identity is read from the JWT payload segment. Signature checks
//! belong to the identity provider in front of the service.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credential")]
    Missing,

    #[error("malformed credential: {0}")]
    Malformed(String),
}

/// Identity claims carried by a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
}

/// A bearer token together with the identity it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub claims: Claims,
}

impl Credential {
    pub fn parse(token: &str) -> Result<Self, AuthError> {
        Ok(Self {
            token: token.to_string(),
            claims: decode_claims(token)?,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.claims.user_id
    }
}

/// Strips the `Bearer ` scheme from an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Decodes the identity claim from a JWT. Looks at `userId`, `id`, then `sub`.
pub fn decode_claims(jwt: &str) -> Result<Claims, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Malformed("JWT must have 3 parts".into()));
    }

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::Malformed(format!("base64 decode failed: {e}")))?;

    let payload: serde_json::Value = serde_json::from_slice(&payload_bytes)
        .map_err(|e| AuthError::Malformed(format!("JSON parse failed: {e}")))?;

    let user_id = ["userId", "id", "sub"]
        .iter()
        .find_map(|key| match payload.get(*key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| AuthError::Malformed("no identity claim".into()))?;

    Ok(Claims { user_id })
}

/// Builds an unsigned token carrying `claims`. Test helper shared by the
/// service and editor crates.
pub fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signature = URL_SAFE_NO_PAD.encode(b"sig");
    format!("{header}.{payload}.{signature}")
}

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use resume::auth::{bearer_token, decode_claims, Claims};
use tracing::warn;

use crate::errors::AppError;

/// The authenticated caller, taken from the `Authorization: Bearer` header.
/// Rejects with 401 before any other extractor or store access runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }

    /// The caller may only address their own document.
    pub fn ensure_owner(&self, user_id: &str) -> Result<(), AppError> {
        if self.user_id() == user_id {
            Ok(())
        } else {
            warn!(
                "User {} attempted to access resume of user {user_id}",
                self.user_id()
            );
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = bearer_token(header).ok_or(AppError::Unauthorized)?;

        let claims = decode_claims(token).map_err(|e| {
            warn!("Rejected credential: {e}");
            AppError::Unauthorized
        })?;

        Ok(AuthUser(claims))
    }
}

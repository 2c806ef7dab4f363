//! Authentication extractors for Axum handlers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::errors::AppError;
use crate::state::AppState;

/// Authenticated actor extracted from a Bearer token in the
/// `Authorization` header. Use as a handler parameter wherever a request
/// must be tied to an identity.
#[derive(Debug, Clone)]
pub struct AuthActor {
    pub actor_id: Uuid,
    pub is_superuser: bool,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims =
            validate_token(token, &state.config.jwt_secret).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthActor {
            actor_id: claims.sub,
            is_superuser: claims.superuser,
        })
    }
}

/// Extractor that additionally requires the superuser flag; rejects other
/// authenticated actors with 403. Used by the dashboard.
#[derive(Debug, Clone)]
pub struct Superuser(pub AuthActor);

#[async_trait]
impl FromRequestParts<AppState> for Superuser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = AuthActor::from_request_parts(parts, state).await?;
        if !actor.is_superuser {
            return Err(AppError::Forbidden);
        }
        Ok(Superuser(actor))
    }
}

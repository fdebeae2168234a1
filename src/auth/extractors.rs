use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{dto::UserProfile, jwt::JwtKeys, session},
    error::AppError,
    state::AppState,
};

/// Identity resolved from the session cookie.
///
/// Missing cookie or a token that fails verification is 401, a valid token
/// whose user no longer exists is 404, and a store failure is 500. Store
/// lookups only happen after the token verifies.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub profile: UserProfile,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session::token(&jar, &state.config.cookie)
            .ok_or(AppError::Unauthorized("Unauthorized: No Token Provided"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Unauthorized: Invalid Token")
        })?;

        let user = match state.users.find_by_id(claims.sub).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(user_id = %claims.sub, "token for unknown user");
                return Err(AppError::NotFound("User not found"));
            }
            Err(e) => return Err(AppError::Internal(e.context("session user lookup failed"))),
        };

        Ok(AuthUser {
            id: user.id,
            profile: user.into(),
        })
    }
}

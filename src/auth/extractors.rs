use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::{claims::TokenKind, jwt::JwtKeys};
use crate::{
    error::AppError,
    state::AppState,
    users::model::{User, UserContext},
};

/// Validated access token subject.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthorized("Access token required".into()));
        }

        Ok(AuthUser(claims.sub))
    }
}

/// Authenticated caller whose account still exists.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserContext);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        let user = User::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
        Ok(CurrentUser(user.context()))
    }
}

/// Authenticated caller who has completed onboarding.
#[derive(Debug, Clone, Copy)]
pub struct OnboardedUser(pub UserContext);

#[async_trait]
impl FromRequestParts<AppState> for OnboardedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(ctx) = CurrentUser::from_request_parts(parts, state).await?;
        require_onboarded(ctx).map(OnboardedUser)
    }
}

pub fn require_onboarded(ctx: UserContext) -> Result<UserContext, AppError> {
    if ctx.is_onboarded {
        Ok(ctx)
    } else {
        Err(AppError::NotOnboarded)
    }
}

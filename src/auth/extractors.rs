use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::{Claims, JwtKeys, TokenKind};
use crate::auth::repo::Role;
use crate::error::ApiError;

/// Bearer-token authentication. Missing header, a header that is not
/// exactly `Bearer <token>`, and invalid or expired tokens all reject
/// with 401; on success the decoded claims ride along with the request.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

        let pieces: Vec<&str> = header.split(' ').collect();
        let token = match pieces.as_slice() {
            ["Bearer", token] if !token.is_empty() => *token,
            _ => return Err(ApiError::unauthorized("invalid authorization header")),
        };

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::unauthorized(e.to_string())
        })?;

        if claims.kind != TokenKind::Session {
            return Err(ApiError::unauthorized("invalid authorization header"));
        }

        Ok(AuthUser(claims))
    }
}

/// Role guard: seeker-only endpoints.
pub struct Seeker(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for Seeker
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_role(&claims, Role::Seeker)?;
        Ok(Seeker(claims))
    }
}

/// Role guard: employer-only endpoints.
pub struct Employer(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for Employer
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_role(&claims, Role::Employer)?;
        Ok(Employer(claims))
    }
}

/// Verified-account guard, composable after a role guard.
pub struct Verified(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for Verified
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_verified(&claims)?;
        Ok(Verified(claims))
    }
}

fn require_role(claims: &Claims, role: Role) -> Result<(), ApiError> {
    if claims.role == Some(role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "you do not have permission to access this resource".into(),
        ))
    }
}

fn require_verified(claims: &Claims) -> Result<(), ApiError> {
    if claims.verified == Some(true) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("account not verified".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(role: Option<Role>, verified: Option<bool>) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "a@b.com".into(),
            role,
            verified,
            iat: 0,
            exp: 0,
            kind: TokenKind::Session,
        }
    }

    #[test]
    fn role_guard_matches_exact_role() {
        assert!(require_role(&claims(Some(Role::Seeker), None), Role::Seeker).is_ok());
        assert!(require_role(&claims(Some(Role::Seeker), None), Role::Employer).is_err());
        assert!(require_role(&claims(None, None), Role::Seeker).is_err());
    }

    #[test]
    fn verified_guard_requires_explicit_true() {
        assert!(require_verified(&claims(None, Some(true))).is_ok());
        assert!(require_verified(&claims(None, Some(false))).is_err());
        assert!(require_verified(&claims(None, None)).is_err());
    }
}

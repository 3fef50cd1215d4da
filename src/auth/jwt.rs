use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo::{Role, User};
use crate::config::JwtConfig;
use crate::state::AppState;

/// Session tokens authenticate requests; verify tokens are the short-lived,
/// single-purpose credentials mailed out for account verification and
/// password reset. They carry only `{sub, email}`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Session,
    Verify,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    pub iat: usize,
    pub exp: usize,
    pub kind: TokenKind,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub session_ttl: Duration,
    pub verify_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_minutes, verify_ttl_minutes } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl: Duration::from_secs((ttl_minutes as u64) * 60),
            verify_ttl: Duration::from_secs((verify_ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    fn sign(
        &self,
        sub: Uuid,
        email: &str,
        role: Option<Role>,
        verified: Option<bool>,
        kind: TokenKind,
        ttl: TimeDuration,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + ttl;
        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            verified,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %sub, kind = ?kind, "jwt signed");
        Ok(token)
    }

    /// Full claim set for authenticated requests.
    pub fn sign_session(&self, user: &User) -> anyhow::Result<String> {
        self.sign(
            user.id,
            &user.email,
            Some(user.role),
            Some(user.is_verified),
            TokenKind::Session,
            TimeDuration::seconds(self.session_ttl.as_secs() as i64),
        )
    }

    /// Narrow `{sub, email}` token for single-purpose email flows.
    pub fn sign_verify(&self, id: Uuid, email: &str) -> anyhow::Result<String> {
        self.sign(
            id,
            email,
            None,
            None,
            TokenKind::Verify,
            TimeDuration::seconds(self.verify_ttl.as_secs() as i64),
        )
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
                Ok(data.claims)
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn make_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".into(),
            password_hash: String::new(),
            first_name: "Test".into(),
            last_name: "User".into(),
            role: Role::Employer,
            is_verified: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn session_token_roundtrips_full_claim_set() {
        let keys = make_keys();
        let user = make_user();
        let token = keys.sign_session(&user).expect("sign session");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Some(Role::Employer));
        assert_eq!(claims.verified, Some(true));
        assert_eq!(claims.kind, TokenKind::Session);
    }

    #[tokio::test]
    async fn verify_token_carries_narrow_claims() {
        let keys = make_keys();
        let id = Uuid::new_v4();
        let token = keys.sign_verify(id, "a@b.com").expect("sign verify");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, None);
        assert_eq!(claims.verified, None);
        assert_eq!(claims.kind, TokenKind::Verify);
    }

    #[tokio::test]
    async fn expired_token_fails_with_expiry_reason() {
        let keys = make_keys();
        let token = keys
            .sign(
                Uuid::new_v4(),
                "a@b.com",
                None,
                None,
                TokenKind::Session,
                TimeDuration::seconds(-120),
            )
            .expect("sign expired");
        let err = keys.verify(&token).unwrap_err();
        assert_eq!(err, TokenError::Expired);
        assert_eq!(err.to_string(), "Token expired");
    }

    #[tokio::test]
    async fn tampered_token_fails_as_invalid() {
        let keys = make_keys();
        let user = make_user();
        let mut token = keys.sign_session(&user).expect("sign session");
        token.push('x');
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Invalid);
    }
}

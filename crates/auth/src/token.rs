//! Session token issuing and validation (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use courselib_core::UserId;

use crate::{Identity, JwtClaims, RoleSet, TokenValidationError, validate_claims};

/// Session artifact returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: UserId,
    pub roles: RoleSet,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign session token: {0}")]
    Signing(String),

    #[error("session expiry is out of range")]
    ExpiryOutOfRange,
}

/// Issues session tokens bound to an identity.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<SessionToken, TokenError>;
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HMAC-SHA256 signed JWTs with a fixed lifetime.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign arbitrary claims (used by `issue`, and by tests minting tokens).
    pub fn encode(&self, claims: &JwtClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer for Hs256Jwt {
    fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<SessionToken, TokenError> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = JwtClaims {
            sub: identity.user_id(),
            roles: identity.roles().clone(),
            issued_at: now,
            expires_at,
        };
        let access_token = self.encode(&claims)?;

        Ok(SessionToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_at: claims.expires_at,
            user_id: claims.sub,
            roles: claims.roles,
        })
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        // Time checks run against the caller's clock in `validate_claims`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenValidationError::Invalid)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn jwt(secret: &str) -> Hs256Jwt {
        Hs256Jwt::new(secret.as_bytes(), Duration::minutes(30))
    }

    #[test]
    fn issued_token_validates_to_same_identity() {
        let jwt = jwt("secret");
        let identity = Identity::new(UserId::new(), [Role::Admin, Role::User]);
        let now = Utc::now();

        let token = jwt.issue(&identity, now).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.user_id, identity.user_id());

        let claims = jwt.validate(&token.access_token, now).unwrap();
        assert_eq!(claims.identity(), identity);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let identity = Identity::new(UserId::new(), [Role::User]);
        let now = Utc::now();
        let token = jwt("one").issue(&identity, now).unwrap();

        assert_eq!(
            jwt("two").validate(&token.access_token, now),
            Err(TokenValidationError::Invalid)
        );
    }

    #[test]
    fn expiry_uses_supplied_clock() {
        let jwt = jwt("secret");
        let identity = Identity::new(UserId::new(), [Role::User]);
        let now = Utc::now();
        let token = jwt.issue(&identity, now).unwrap();

        assert_eq!(
            jwt.validate(&token.access_token, now + Duration::hours(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let jwt = Hs256Jwt::new(b"secret", Duration::weeks(52 * 300_000));
        let identity = Identity::new(UserId::new(), [Role::User]);

        assert_eq!(
            jwt.issue(&identity, Utc::now()).unwrap_err(),
            TokenError::ExpiryOutOfRange
        );
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(
            jwt("secret").validate("not.a.jwt", Utc::now()),
            Err(TokenValidationError::Invalid)
        );
    }
}

//! Token service - issues and verifies signed session tokens.
//!
//! Tokens are stateless HS256 JWTs: the signature plus `exp` is the
//! whole session, nothing is stored server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::User;
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Signed token handed to a client after signin or signup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Token service trait for dependency injection.
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the user's id and email
    fn issue(&self, user: &User) -> AppResult<IssuedToken>;

    /// Check signature and expiry and return the claims
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// HS256 implementation keyed by the configured secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtTokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret_bytes()),
            expiration_hours: config.jwt_expiration_hours,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tokio_test::{assert_err, assert_ok};

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn service() -> JwtTokenService {
        JwtTokenService::new(&Config::new("sqlite::memory:", SECRET).unwrap())
    }

    fn user() -> User {
        User::new(
            Uuid::new_v4(),
            "ada@x.com".into(),
            "hash".into(),
            "Ada".into(),
            None,
        )
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service();
        let user = user();

        let issued = assert_ok!(tokens.issue(&user));
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 24 * 3600);

        let claims = assert_ok!(tokens.verify(&issued.token));
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "ada@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_rejects_tampered_token() {
        let tokens = service();
        let mut issued = tokens.issue(&user()).unwrap().token;
        issued.push('x');

        assert!(matches!(tokens.verify(&issued), Err(AppError::Jwt(_))));
        assert_err!(tokens.verify("not-a-token"));
    }

    #[test]
    fn test_rejects_other_secret() {
        let issued = service().issue(&user()).unwrap();
        let other = JwtTokenService::new(
            &Config::new("sqlite::memory:", "another-secret-key-that-is-32-chars!").unwrap(),
        );

        assert_err!(other.verify(&issued.token));
    }

    #[test]
    fn test_rejects_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ada@x.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_err!(service().verify(&token));
    }
}

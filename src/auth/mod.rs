pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use password::{hash_password, verify_password};

/// Tokens expire this long after they are issued.
pub const TOKEN_TTL_MINUTES: i64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_name: String,
    /// Decimal user id; kept as a string on the wire.
    pub user_id: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_name: &str, user_id: i64, issued_at: DateTime<Utc>) -> Self {
        let exp = (issued_at + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp();

        Self {
            user_name: user_name.to_string(),
            user_id: user_id.to_string(),
            exp,
            iat: issued_at.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is invalid: {0}")]
    InvalidToken(String),

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("JWT generation error: {0}")]
    Signing(String),

    #[error("password hashing error: {0}")]
    Hashing(String),
}

/// Issues and verifies HS256 session tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn issue(&self, user_name: &str, user_id: i64) -> Result<String, AuthError> {
        self.issue_at(Utc::now(), user_name, user_id)
    }

    /// Issue a token as if it had been minted at `issued_at`.
    pub fn issue_at(
        &self,
        issued_at: DateTime<Utc>,
        user_name: &str,
        user_id: i64,
    ) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::Signing("signing secret is empty".to_string()));
        }

        let claims = Claims::new(user_name, user_id, issued_at);
        let encoding_key = EncodingKey::from_secret(&self.secret);

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry and return the claims.
    pub fn parse(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(&self.secret);
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::Malformed(e.to_string()),
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn test_issue_then_parse() {
        let tokens = service();
        let token = tokens.issue("a@b.com", 7).unwrap();
        let claims = tokens.parse(&token).unwrap();

        assert_eq!(claims.user_name, "a@b.com");
        assert_eq!(claims.user_id, "7");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn test_token_valid_until_twenty_minutes() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(19);
        let token = tokens.issue_at(issued, "a@b.com", 1).unwrap();
        assert!(tokens.parse(&token).is_ok());
    }

    #[test]
    fn test_token_rejected_after_twenty_minutes() {
        let tokens = service();
        let issued = Utc::now() - Duration::minutes(21);
        let token = tokens.issue_at(issued, "a@b.com", 1).unwrap();
        assert!(matches!(tokens.parse(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_secret_is_signature_error() {
        let token = TokenService::new("other-secret").issue("a@b.com", 1).unwrap();
        assert!(matches!(service().parse(&token), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(service().parse("not-a-token"), Err(AuthError::Malformed(_))));
        assert!(matches!(service().parse("a.b.c"), Err(AuthError::Malformed(_))));
    }

    #[test]
    fn test_empty_secret_cannot_sign() {
        let err = TokenService::new("").issue("a@b.com", 1).unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }
}

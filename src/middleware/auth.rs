use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    response::IntoResponse,
};

use crate::auth::{AuthError, Claims, TokenService};
use crate::error::{ApiError, NOT_ALLOWED};

use super::{Flow, Interceptor};

/// Caller identity taken from a verified bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_name: String,
    pub user_id: i64,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .user_id
            .parse::<i64>()
            .map_err(|_| AuthError::Malformed(format!("user_id {:?} is not an integer", claims.user_id)))?;

        Ok(Self {
            user_name: claims.user_name,
            user_id,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("UnAuthorized"))
    }
}

/// Rejects requests without a valid bearer token and records the caller.
pub struct AuthInterceptor {
    tokens: Arc<TokenService>,
}

impl AuthInterceptor {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.tokens.parse(token)?;
        Ok(AuthUser::try_from(claims)?)
    }
}

#[async_trait]
impl Interceptor for AuthInterceptor {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn intercept(&self, mut request: Request) -> Flow {
        match self.authenticate(request.headers()) {
            Ok(user) => {
                tracing::debug!("authenticated {} ({})", user.user_name, user.user_id);
                request.extensions_mut().insert(user);
                Flow::Continue(request)
            }
            Err(err) => {
                tracing::debug!("rejected {} {}: {}", request.method(), request.uri().path(), err);
                Flow::Respond(err.into_response())
            }
        }
    }
}

/// Take the token out of `Authorization: Bearer <token>`.
///
/// The first seven characters are dropped without checking that they read
/// `Bearer `; whatever remains is treated as the token.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::from(AuthError::MissingHeader))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::bad_request(NOT_ALLOWED))?;

    match value.get(7..) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingHeader.into()),
    }
}

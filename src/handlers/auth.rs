// handlers/auth.rs - POST /api/v1/auth/register and POST /api/v1/auth/login

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::password::validate_email_format;
use crate::auth::{hash_password, verify_password, AuthError};
use crate::database::DatabaseError;
use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn decode_credentials(body: &[u8]) -> Result<Credentials, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("undecodable credentials: {}", e);
        ApiError::bad_request("Invalid Request")
    })
}

/// Run a bcrypt operation on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!("bcrypt task failed: {}", e);
            ApiError::internal_server_error("Internal Server Error")
        })?
        .map_err(ApiError::from)
}

/// Create an account. The response carries no token; the client logs in next.
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let Credentials { user_name, password } = decode_credentials(&body)?;

    validate_email_format(&user_name).map_err(|e| {
        tracing::debug!("rejected user name {:?}: {}", user_name, e);
        ApiError::bad_request("email not in correct format")
    })?;

    let cost = state.bcrypt_cost;
    let hash = blocking(move || hash_password(&password, cost)).await?;

    let user_id = state
        .store
        .create_user(&user_name, &hash)
        .await
        .map_err(|e| {
            tracing::error!("Error creating user {}: {}", user_name, e);
            ApiError::internal_server_error("Error Creating User")
        })?;

    tracing::info!("registered user {} ({})", user_name, user_id);
    Ok(Json(AuthResponse {
        user_id: user_id.to_string(),
        user_name,
        token: None,
    }))
}

/// Check credentials and hand out a session token.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let Credentials { user_name, password } = decode_credentials(&body)?;

    let user = match state.store.find_user_by_name(&user_name).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound(_)) => return Err(ApiError::not_found("User Not Found")),
        Err(e) => return Err(e.into()),
    };

    let stored = user.password.clone();
    let matches = blocking(move || verify_password(&stored, &password)).await?;
    if !matches {
        tracing::info!("wrong password for {}", user_name);
        return Err(ApiError::unauthorized("Wrong Password Or User"));
    }

    let token = state.tokens.issue(&user.user_name, user.user_id)?;

    tracing::info!("user {} logged in", user.user_name);
    Ok(Json(AuthResponse {
        user_id: user.user_id.to_string(),
        user_name,
        token: Some(token),
    }))
}

// handlers/mod.rs - request handlers and the state they share
//
// Public:    GET /, POST /tax, POST /api/v1/auth/{register,login}
// Protected: /api/v1/projects[/:id] (bearer token required)

pub mod auth;
pub mod health;
pub mod projects;
pub mod tax;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::auth::TokenService;
use crate::database::Store;

pub use auth::{login, register};
pub use health::health;
pub use projects::{create_project, delete_project, get_project, list_projects, update_project};
pub use tax::calculate_tax;

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }
}

/// 200 with a JSON content type and no body.
pub(crate) fn empty_json() -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")]).into_response()
}

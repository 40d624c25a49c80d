// handlers/projects.rs - /api/v1/projects[/:id]
//
// Only creation touches the datastore. The other routes answer without
// reading or changing any project.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::database::Project;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::{empty_json, AppState};

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub message: String,
    pub id: String,
}

/// Store a new project owned by the caller.
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<Json<Project>, ApiError> {
    tracing::info!("User accessing is {}", user.user_id);

    let mut project: Project = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("undecodable project: {}", e);
        ApiError::bad_request("Invalid Request")
    })?;

    let project_id = state
        .store
        .create_project(&project, user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Error creating project: {}", e);
            ApiError::bad_request("Invalid Request")
        })?;

    project.project_id = Some(project_id);
    project.user_id = Some(user.user_id);
    Ok(Json(project))
}

pub async fn list_projects(user: AuthUser) -> Response {
    tracing::info!("User accessing is {}", user.user_id);
    empty_json()
}

pub async fn get_project(user: AuthUser, Path(id): Path<String>) -> Response {
    tracing::info!("User accessing is {} (project {})", user.user_id, id);
    empty_json()
}

pub async fn update_project(Path(id): Path<String>) -> Json<RouteResponse> {
    tracing::info!("update requested for project with id {}, nothing stored", id);
    Json(RouteResponse {
        message: "Update not implemented".to_string(),
        id,
    })
}

pub async fn delete_project(Path(id): Path<String>) -> Response {
    tracing::debug!("delete requested for project {}", id);
    empty_json()
}

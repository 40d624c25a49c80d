use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::routing::{get, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, AppState};
use crate::middleware::{AuthInterceptor, Interceptor, Pipeline, RequestLogger, SchemaValidation};
use crate::schema::{SchemaError, SchemaRegistry};

pub const LOGIN_SCHEMA: &str = "loginuser.json";
pub const PROJECT_SCHEMA: &str = "projects.json";

fn validation(
    schemas: &SchemaRegistry,
    name: &str,
    body_limit: usize,
) -> Result<Arc<dyn Interceptor>, SchemaError> {
    let raw = schemas.get(name).unwrap_or_else(|| {
        tracing::warn!("schema {} not loaded; accepting any JSON object", name);
        ""
    });
    Ok(Arc::new(SchemaValidation::new(raw, body_limit)?))
}

/// Build the application router.
///
/// Every route gets its own interceptor chain; schemas are compiled here, so
/// a broken schema file stops startup.
pub fn router(
    state: AppState,
    schemas: &SchemaRegistry,
    body_limit: usize,
) -> Result<Router, SchemaError> {
    let logging = Pipeline::new().with(RequestLogger);
    let credentials = logging
        .clone()
        .with_shared(validation(schemas, LOGIN_SCHEMA, body_limit)?);
    let authed = logging
        .clone()
        .with(AuthInterceptor::new(state.tokens.clone()));
    let project_body = authed
        .clone()
        .with_shared(validation(schemas, PROJECT_SCHEMA, body_limit)?);

    let router = Router::new()
        // Public
        .route("/", get(handlers::health.layer(logging.layer())))
        .route("/tax", post(handlers::calculate_tax.layer(logging.layer())))
        .route(
            "/api/v1/auth/register",
            post(handlers::register.layer(credentials.layer())),
        )
        .route(
            "/api/v1/auth/login",
            post(handlers::login.layer(credentials.layer())),
        )
        // Protected
        .route(
            "/api/v1/projects",
            get(handlers::list_projects.layer(authed.layer()))
                .post(handlers::create_project.layer(project_body.layer())),
        )
        .route(
            "/api/v1/projects/:id",
            get(handlers::get_project.layer(authed.layer()))
                .put(handlers::update_project.layer(project_body.layer()))
                .delete(handlers::delete_project.layer(authed.layer())),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kanban_api::auth::TokenService;
use kanban_api::config::{AppConfig, ServerMode};
use kanban_api::database::{self, PgStore};
use kanban_api::handlers::AppState;
use kanban_api::schema::SchemaRegistry;

/// Kanban project tracker API server
#[derive(Debug, Parser)]
#[command(name = "kanban-api", version)]
struct Args {
    /// Selects the env file to load (.env.dev, .env or .env.test)
    #[arg(long, value_enum, default_value_t = ServerMode::Dev)]
    mode: ServerMode,

    /// Listen port; takes precedence over KANBAN_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let env_file = args.mode.env_file();
    match dotenvy::from_filename(env_file) {
        Ok(path) => tracing::info!("loaded environment from {}", path.display()),
        Err(e) => tracing::warn!("could not load {}: {}", env_file, e),
    }

    let mut config = AppConfig::from_env(args.mode).context("invalid configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    tracing::info!("Starting kanban API in {:?} mode", config.mode);

    let schemas = SchemaRegistry::load(&config.schema_dir)
        .with_context(|| format!("failed to load schemas from {}", config.schema_dir.display()))?;

    let pool = database::connect(&config).context("failed to create database pool")?;
    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(TokenService::new(config.jwt_secret.as_bytes())),
        config.bcrypt_cost,
    );

    let app = kanban_api::router(state, &schemas, config.api.max_request_size_bytes)
        .context("failed to build router")?;

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("kanban API listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;

    Ok(())
}

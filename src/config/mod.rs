use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port the API listens on unless overridden.
pub const DEFAULT_PORT: u16 = 4000;

/// Startup configuration errors. All of these are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{0} is not a valid database URL")]
    InvalidDatabaseUrl(&'static str),

    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Server mode selected on the command line; picks the env file to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ServerMode {
    #[default]
    Dev,
    Prod,
    Test,
}

impl ServerMode {
    pub fn env_file(&self) -> &'static str {
        match self {
            ServerMode::Dev => ".env.dev",
            ServerMode::Prod => ".env",
            ServerMode::Test => ".env.test",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: ServerMode,
    pub port: u16,
    pub database_url: String,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub schema_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    /// Pool acquire timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// The env file for `mode` should already have been loaded into the
    /// environment by the caller.
    pub fn from_env(mode: ServerMode) -> Result<Self, ConfigError> {
        Self::from_lookup(mode, |name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(mode: ServerMode, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required("PSQL_URL")?;
        url::Url::parse(&database_url).map_err(|_| ConfigError::InvalidDatabaseUrl("PSQL_URL"))?;
        let jwt_secret = required("JWT_KEY")?;
        let schema_dir = PathBuf::from(required("SCHEMA_PATH")?);

        let (database, api) = match mode {
            ServerMode::Prod => Self::production(),
            ServerMode::Test => Self::testing(),
            ServerMode::Dev => Self::development(),
        };

        let mut config = Self {
            mode,
            port: DEFAULT_PORT,
            database_url,
            jwt_secret,
            schema_dir,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            database,
            api,
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(lookup, "KANBAN_PORT")? {
            self.port = v;
        }
        if let Some(v) = parse_var(lookup, "BCRYPT_COST")? {
            self.bcrypt_cost = v;
        }
        if let Some(v) = parse_var(lookup, "DATABASE_MAX_CONNECTIONS")? {
            self.database.max_connections = v;
        }
        if let Some(v) = parse_var(lookup, "DATABASE_CONNECTION_TIMEOUT")? {
            self.database.connection_timeout = v;
        }
        if let Some(v) = parse_var(lookup, "API_MAX_REQUEST_SIZE_BYTES")? {
            self.api.max_request_size_bytes = v;
        }
        Ok(())
    }

    fn development() -> (DatabaseConfig, ApiConfig) {
        (
            DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
        )
    }

    fn testing() -> (DatabaseConfig, ApiConfig) {
        (
            DatabaseConfig {
                max_connections: 5,
                connection_timeout: 5,
            },
            ApiConfig {
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
        )
    }

    fn production() -> (DatabaseConfig, ApiConfig) {
        (
            DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            ApiConfig {
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
        )
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Project, User};

/// Persistence operations used by the handlers.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user and return the generated id.
    async fn create_user(&self, user_name: &str, password_hash: &str) -> Result<i64, DatabaseError>;

    /// Look up a user by login handle. Missing users are `DatabaseError::NotFound`.
    async fn find_user_by_name(&self, user_name: &str) -> Result<User, DatabaseError>;

    /// Insert a project owned by `owner_id` and return the generated id.
    async fn create_project(&self, project: &Project, owner_id: i64) -> Result<i64, DatabaseError>;
}

/// `Store` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user_name: &str, password_hash: &str) -> Result<i64, DatabaseError> {
        // Unique violations on user_name surface as a plain sqlx error.
        let user_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO "users" (user_name, password) VALUES ($1, $2) RETURNING user_id"#,
        )
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_id)
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            r#"SELECT user_id, user_name, password FROM "users" WHERE user_name = $1"#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("user '{}' not found", user_name)))
    }

    async fn create_project(&self, project: &Project, owner_id: i64) -> Result<i64, DatabaseError> {
        let query = r#"
            INSERT INTO projects (
                name, rebo_url, site_url, description,
                dependencies, dev_dependencies, status, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING project_id
        "#;

        let project_id: i64 = sqlx::query_scalar(query)
            .bind(&project.name)
            .bind(&project.rebo_url)
            .bind(&project.site_url)
            .bind(&project.description)
            .bind(&project.dependencies)
            .bind(&project.dev_dependencies)
            .bind(&project.status)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(project_id)
    }
}

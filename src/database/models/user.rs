use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    /// bcrypt hash
    #[serde(skip_serializing)]
    pub password: String,
}

//! Test helpers: an in-memory `Store` and a ready-made application state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::database::{DatabaseError, Project, Store, User};
use crate::handlers::AppState;

/// Secret used to sign tokens in tests.
pub const TEST_SECRET: &str = "test-secret";

/// Cheapest bcrypt cost; keeps tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
}

/// `Store` kept in memory. User names are unique, like the real table.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn project_count(&self) -> usize {
        self.tables.read().await.projects.len()
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.tables.read().await.projects.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user_name: &str, password_hash: &str) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.user_name == user_name) {
            return Err(DatabaseError::QueryError(format!(
                "duplicate key value violates unique constraint: user_name={}",
                user_name
            )));
        }

        let user_id = tables.users.len() as i64 + 1;
        tables.users.push(User {
            user_id,
            user_name: user_name.to_string(),
            password: password_hash.to_string(),
        });
        Ok(user_id)
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<User, DatabaseError> {
        self.tables
            .read()
            .await
            .users
            .iter()
            .find(|u| u.user_name == user_name)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("user '{}' not found", user_name)))
    }

    async fn create_project(&self, project: &Project, owner_id: i64) -> Result<i64, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.user_id == owner_id) {
            return Err(DatabaseError::QueryError(format!(
                "owner {} does not exist",
                owner_id
            )));
        }

        let project_id = tables.projects.len() as i64 + 1;
        tables.projects.push(Project {
            project_id: Some(project_id),
            user_id: Some(owner_id),
            ..project.clone()
        });
        Ok(project_id)
    }
}

/// Application state over a fresh `MemoryStore`, returned alongside it.
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        Arc::new(TokenService::new(TEST_SECRET)),
        TEST_BCRYPT_COST,
    );
    (state, store)
}

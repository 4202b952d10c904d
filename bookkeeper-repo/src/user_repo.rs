use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError>;
    async fn get_user_by_github_id(&self, github_id: &str) -> Result<User, UserRepoError>;
    async fn create_user(&self, user: User) -> Result<(), UserRepoError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError>;
}

/// Identity imported from GitHub OAuth. Immutable after creation except via
/// re-login.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub github_id: String,
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        github_id: String,
        username: String,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            github_id,
            username,
            name,
            avatar_url,
            created_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("User {0} already exists")]
    UserAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

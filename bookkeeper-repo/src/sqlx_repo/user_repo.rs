use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::{User, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        let user: Option<User> = sqlx::query_as::<_, User>(
            "SELECT id, github_id, username, name, avatar_url, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", user_id))?;
        user.ok_or_else(|| UserRepoError::UserNotFound(user_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn get_user_by_github_id(&self, github_id: &str) -> Result<User, UserRepoError> {
        let user: Option<User> = sqlx::query_as::<_, User>(
            "SELECT id, github_id, username, name, avatar_url, created_at FROM users \
             WHERE github_id = $1",
        )
        .bind(github_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user with github id {}", github_id))?;
        user.ok_or_else(|| UserRepoError::UserNotFound(github_id.to_owned()))
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        let result = sqlx::query(
            "INSERT INTO users(id, github_id, username, name, avatar_url, created_at) \
             VALUES($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.github_id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to create user {}", user.id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserAlreadyExists(user.id))
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_owned()))
        }
    }
}

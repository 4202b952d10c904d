use crate::session_repo::{Session, SessionRepo, SessionRepoError};
use crate::sqlx_repo::SQLxRepo;
use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

#[async_trait]
impl SessionRepo for SQLxRepo {
    #[instrument(skip(self, session))]
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError> {
        sqlx::query("INSERT INTO sessions(id, user_id, expires_at) VALUES($1, $2, $3)")
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to create session for user {}", session.user_id))?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn get_session(&self, session_id: &str) -> Result<Session, SessionRepoError> {
        let session: Option<Session> =
            sqlx::query_as::<_, Session>("SELECT id, user_id, expires_at FROM sessions WHERE id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .context("Unable to get session")?;
        session.ok_or(SessionRepoError::SessionNotFound)
    }

    #[instrument(skip_all)]
    async fn delete_session(&self, session_id: &str) -> Result<(), SessionRepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .context("Unable to delete session")?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(SessionRepoError::SessionNotFound)
        }
    }
}

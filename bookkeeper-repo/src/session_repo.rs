use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[async_trait]
pub trait SessionRepo: Sync + Send {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError>;
    async fn get_session(&self, session_id: &str) -> Result<Session, SessionRepoError>;
    async fn delete_session(&self, session_id: &str) -> Result<(), SessionRepoError>;
}

/// Server-side record backing a login cookie. Expired sessions are deleted
/// lazily, the next time they are presented.
#[derive(Clone, PartialEq, Debug, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub const TTL_DAYS: i64 = 7;

    pub fn new(user_id: String) -> Session {
        Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            expires_at: Utc::now() + Duration::days(Self::TTL_DAYS),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

#[derive(Error, Debug)]
pub enum SessionRepoError {
    #[error("Session not found")]
    SessionNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

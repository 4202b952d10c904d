use crate::session_repo::{Session, SessionRepo, SessionRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct MemSessionRepo {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemSessionRepo {
    pub fn new() -> MemSessionRepo {
        MemSessionRepo {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<HashMap<String, Session>>, anyhow::Error> {
        self.sessions
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<HashMap<String, Session>>, anyhow::Error> {
        self.sessions
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemSessionRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepo for MemSessionRepo {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;
        write_guard.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Session, SessionRepoError> {
        let read_guard = self.read_lock()?;
        read_guard
            .get(session_id)
            .cloned()
            .ok_or(SessionRepoError::SessionNotFound)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;
        write_guard
            .remove(session_id)
            .map(|_| ())
            .ok_or(SessionRepoError::SessionNotFound)
    }
}

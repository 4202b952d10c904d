use crate::user_repo::{User, UserRepo, UserRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct MemUserRepo {
    users: RwLock<HashMap<String, User>>,
}

impl MemUserRepo {
    pub fn new() -> MemUserRepo {
        MemUserRepo {
            users: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<HashMap<String, User>>, anyhow::Error> {
        self.users
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<HashMap<String, User>>, anyhow::Error> {
        self.users
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepo for MemUserRepo {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;
        read_guard
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserRepoError::UserNotFound(user_id.to_owned()))
    }

    async fn get_user_by_github_id(&self, github_id: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;
        read_guard
            .values()
            .find(|u| u.github_id == github_id)
            .cloned()
            .ok_or_else(|| UserRepoError::UserNotFound(github_id.to_owned()))
    }

    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;
        if write_guard.contains_key(&user.id)
            || write_guard.values().any(|u| u.github_id == user.github_id)
        {
            return Err(UserRepoError::UserAlreadyExists(user.id));
        }
        write_guard.insert(user.id.clone(), user);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;
        write_guard
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| UserRepoError::UserNotFound(user_id.to_owned()))
    }
}

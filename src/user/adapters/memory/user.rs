//! In-memory repository for user accounts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{EmailAddress, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Rejects `user` when another account already holds its email or username.
fn check_unique_keys(users: &HashMap<UserId, User>, user: &User) -> UserRepositoryResult<()> {
    let others = users.values().filter(|other| other.id() != user.id());
    for other in others {
        if other.email() == user.email() {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }
        if other.username() == user.username() {
            return Err(UserRepositoryError::DuplicateUsername(
                user.username().clone(),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(lock_poisoned)?;
        if users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        check_unique_keys(&users, user)?;
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(lock_poisoned)?;
        if !users.contains_key(&user.id()) {
            return Err(UserRepositoryError::NotFound(user.id()));
        }
        check_unique_keys(&users, user)?;
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let users = self.state.read().map_err(lock_poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let users = self.state.read().map_err(lock_poisoned)?;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }

    async fn list(&self) -> UserRepositoryResult<Vec<User>> {
        let users = self.state.read().map_err(lock_poisoned)?;
        let mut listed: Vec<User> = users.values().cloned().collect();
        listed.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.username().as_str().cmp(right.username().as_str()))
        });
        Ok(listed)
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(lock_poisoned)?;
        users
            .remove(&id)
            .map(|_| ())
            .ok_or(UserRepositoryError::NotFound(id))
    }
}

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::UserResult;
use crate::models::{NewUser, User};

/// Repository trait for User persistence
///
/// Every method maps to a single statement against the users table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a record and return it with its assigned id
    async fn insert(&self, user: NewUser) -> UserResult<User>;

    /// All records, ordered by id ascending
    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// Overwrite username, email, age and updated_at of `user.id`.
    ///
    /// Returns the number of affected rows; `created_at` is never written.
    async fn update(&self, user: &User) -> UserResult<u64>;

    /// Returns the number of affected rows
    async fn delete_by_id(&self, id: i64) -> UserResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        store.last_id += 1;
        let user = User {
            id: store.last_id,
            username: user.username,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        store.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn update(&self, user: &User) -> UserResult<u64> {
        let mut store = self.store.write().await;

        match store.users.get_mut(&user.id) {
            Some(existing) => {
                existing.username = user.username.clone();
                existing.email = user.email.clone();
                existing.age = user.age;
                existing.updated_at = user.updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<u64> {
        let mut store = self.store.write().await;
        Ok(u64::from(store.users.remove(&id).is_some()))
    }
}

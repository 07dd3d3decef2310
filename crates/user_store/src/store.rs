//! User store trait and the in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{NewUser, StoreResult, User};

/// Trait for user storage operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, or updates `name` and `email` in place when a row
    /// with the same `uid` already exists. A single atomic operation;
    /// returns the resulting row.
    async fn upsert_user(&self, user: NewUser) -> StoreResult<User>;

    /// Gets a user by external identifier.
    async fn get_user(&self, uid: &str) -> StoreResult<Option<User>>;

    /// Lists all users, oldest first.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Round-trip check against the backing database.
    async fn ping(&self) -> StoreResult<()>;
}

/// In-memory implementation for testing.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn upsert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().unwrap();
        let row = match users.get_mut(&user.uid) {
            Some(existing) => {
                existing.name = user.name;
                existing.email = user.email;
                existing.updated_at = chrono::Utc::now();
                existing.clone()
            }
            None => {
                let row = User::new(user.uid.clone(), user.name, user.email);
                users.insert(user.uid, row.clone());
                row
            }
        };
        Ok(row)
    }

    async fn get_user(&self, uid: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.get(uid).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().unwrap();
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

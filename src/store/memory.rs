//! In-process user store

use async_trait::async_trait;
use futures::stream;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Result, StoreError, UserStore, UserStream};
use crate::models::User;

/// User store backed by a vector, delivering records in insertion order
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_all(&self) -> UserStream {
        // Snapshot so a slow reader never holds the lock
        let snapshot = self.users.read().await.clone();
        Box::pin(stream::iter(snapshot.into_iter().map(Ok)))
    }

    async fn save(&self, mut user: User) -> Result<User> {
        if user.name.trim().is_empty() {
            return Err(StoreError::InvalidRecord(
                "user name must not be blank".to_string(),
            ));
        }

        let mut users = self.users.write().await;

        let existing = user
            .id
            .as_ref()
            .and_then(|id| users.iter().position(|u| u.id.as_ref() == Some(id)));

        match existing {
            Some(index) => users[index] = user.clone(),
            None => {
                if user.id.is_none() {
                    user.id = Some(Uuid::new_v4().to_string());
                }
                users.push(user.clone());
            }
        }

        Ok(user)
    }

    async fn delete_all(&self) -> Result<()> {
        self.users.write().await.clear();
        Ok(())
    }
}

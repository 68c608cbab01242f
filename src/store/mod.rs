//! User record storage
//!
//! The HTTP layer only depends on the [`UserStore`] trait. Records come back
//! as a lazy stream so callers can forward them as they arrive instead of
//! collecting the whole collection first.
//!
//! ```no_run
//! use futures::StreamExt;
//! use reactive_greeter::store::{InMemoryUserStore, UserStore};
//! use reactive_greeter::models::User;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryUserStore::new();
//! store.save(User::unsaved("Ahmed")).await?;
//!
//! let mut users = store.find_all().await;
//! while let Some(user) = users.next().await {
//!     println!("{:?}", user?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod seed;

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use crate::models::User;

pub use error::{Result, StoreError};
pub use memory::InMemoryUserStore;
pub use seed::{seed, SAMPLE_USERS};

/// Lazy sequence of users as delivered by a store
pub type UserStream = Pin<Box<dyn Stream<Item = Result<User>> + Send>>;

/// Async CRUD interface over user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stream every stored user in the store's delivery order
    async fn find_all(&self) -> UserStream;

    /// Persist a user, assigning an id if it has none
    ///
    /// Returns the stored record.
    async fn save(&self, user: User) -> Result<User>;

    /// Remove every stored user
    async fn delete_all(&self) -> Result<()>;
}

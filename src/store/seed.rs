//! Startup sample data

use futures::StreamExt;
use tracing::info;

use super::{Result, UserStore};
use crate::models::User;

/// Names seeded on startup
pub const SAMPLE_USERS: [&str; 4] = ["Ahmed", "John", "Doe", "Salma"];

/// Replace the store contents with one user per name
///
/// Reads the store back after writing and logs each persisted user.
/// Returns the users in the store's delivery order.
pub async fn seed<S>(store: &S, names: &[&str]) -> Result<Vec<User>>
where
    S: UserStore + ?Sized,
{
    store.delete_all().await?;

    for name in names {
        store.save(User::unsaved(*name)).await?;
    }

    let mut persisted = Vec::with_capacity(names.len());
    let mut users = store.find_all().await;
    while let Some(user) = users.next().await {
        let user = user?;
        info!(id = ?user.id, name = %user.name, "seeded user");
        persisted.push(user);
    }

    Ok(persisted)
}

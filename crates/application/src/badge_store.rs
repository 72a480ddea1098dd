use std::collections::HashMap;

use kindernav_domain::BadgeValue;
use tokio::sync::RwLock;

/// Per-user badge counters consulted when dynamic badges are resolved.
///
/// Values never expire; they live until cleared. Writes are last-write-wins.
#[derive(Debug, Default)]
pub struct BadgeStore {
    entries: RwLock<HashMap<String, HashMap<String, BadgeValue>>>,
}

impl BadgeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one source value for a user.
    pub async fn set(&self, user_id: &str, source: &str, value: impl Into<BadgeValue>) {
        self.entries
            .write()
            .await
            .entry(user_id.to_owned())
            .or_default()
            .insert(source.to_owned(), value.into());
    }

    /// Merges several source values into a user's badges.
    pub async fn update(&self, user_id: &str, values: HashMap<String, BadgeValue>) {
        self.entries
            .write()
            .await
            .entry(user_id.to_owned())
            .or_default()
            .extend(values);
    }

    /// Returns a copy of a user's badge values.
    pub async fn snapshot(&self, user_id: &str) -> HashMap<String, BadgeValue> {
        self.entries
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drops every badge value of one user.
    pub async fn clear_user(&self, user_id: &str) {
        self.entries.write().await.remove(user_id);
    }

    /// Drops every badge value.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

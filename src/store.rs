use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{DailyActivityLog, UserProfile};

/// Keyed by user id and calendar date. Writes replace the whole document,
/// last write wins.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()>;

    async fn load_log(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyActivityLog>>;

    async fn save_log(&self, user_id: &str, log: &DailyActivityLog) -> Result<()>;
}

/// Process-local store, used in tests and offline sessions.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    logs: RwLock<HashMap<(String, NaiveDate), DailyActivityLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn load_log(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyActivityLog>> {
        Ok(self
            .logs
            .read()
            .await
            .get(&(user_id.to_string(), date))
            .cloned())
    }

    async fn save_log(&self, user_id: &str, log: &DailyActivityLog) -> Result<()> {
        self.logs
            .write()
            .await
            .insert((user_id.to_string(), log.date), log.clone());
        Ok(())
    }
}

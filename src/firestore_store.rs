use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::firestore::FirestoreClient;
use crate::models::{DailyActivityLog, UserProfile};
use crate::store::ProfileStore;

/// Profiles live at `users/{uid}`, logs at `users/{uid}/logs/{YYYY-MM-DD}`.
#[derive(Clone)]
pub struct FirestoreStore {
    firestore: FirestoreClient,
}

impl FirestoreStore {
    pub fn new(firestore: FirestoreClient) -> Self {
        Self { firestore }
    }

    fn profile_path(user_id: &str) -> String {
        format!("users/{}", user_id)
    }

    fn log_path(user_id: &str, date: NaiveDate) -> String {
        format!("users/{}/logs/{}", user_id, date.format("%Y-%m-%d"))
    }
}

#[async_trait]
impl ProfileStore for FirestoreStore {
    async fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.firestore
            .get(&Self::profile_path(user_id))
            .await
            .map_err(Error::Store)
    }

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        self.firestore
            .set(&Self::profile_path(user_id), profile)
            .await
            .map_err(Error::Store)
    }

    async fn load_log(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyActivityLog>> {
        self.firestore
            .get(&Self::log_path(user_id, date))
            .await
            .map_err(Error::Store)
    }

    async fn save_log(&self, user_id: &str, log: &DailyActivityLog) -> Result<()> {
        self.firestore
            .set(&Self::log_path(user_id, log.date), log)
            .await
            .map_err(Error::Store)
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::FirebaseAuth;
use crate::config::{Config, DayBoundary};
use crate::error::{Error, Result};
use crate::firestore::FirestoreClient;
use crate::firestore_store::FirestoreStore;
use crate::models::*;
use crate::progress::Dashboard;
use crate::store::ProfileStore;
use crate::validation::{
    validate_food, validate_imported_profile, validate_profile, validate_stats, validate_workout,
};

/// Application service: validates input, keeps derived targets in sync and
/// reads/writes through the injected store.
pub struct ReddyFitClient<S> {
    store: Arc<S>,
    workout_target_min: u32,
    day_boundary: DayBoundary,
}

impl<S> Clone for ReddyFitClient<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            workout_target_min: self.workout_target_min,
            day_boundary: self.day_boundary,
        }
    }
}

impl ReddyFitClient<FirestoreStore> {
    /// Sign in with email and password and use Firestore for persistence.
    /// Returns the client together with the signed-in user's id.
    pub async fn login(config: &Config, email: &str, password: &str) -> Result<(Self, String)> {
        let firebase = config
            .firebase
            .as_ref()
            .ok_or_else(|| Error::Config("Firebase is not configured".into()))?;
        let auth = FirebaseAuth::sign_in_with_email(&firebase.api_key, email, password)
            .await?;
        let user_id = auth.get_user_id().await?;
        let store = FirestoreStore::new(FirestoreClient::new(auth, firebase.project_id.clone()));
        Ok((Self::new(store, config), user_id))
    }
}

impl<S: ProfileStore> ReddyFitClient<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store: Arc::new(store),
            workout_target_min: config.workout_target_min,
            day_boundary: config.day_boundary,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Calendar date that `now` falls on for logging purposes.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.day_boundary.date_of(now)
    }

    /// Validate a profile form, recompute targets and persist.
    ///
    /// The first save records the start weight; later saves keep it.
    pub async fn save_profile(&self, user_id: &str, raw: &RawProfile) -> Result<UserProfile> {
        let validated = validate_profile(raw)?;
        self.store_profile(user_id, validated).await
    }

    /// Like [`Self::save_profile`] for profiles carried over from older
    /// data, where an unknown activity level is read as moderate.
    pub async fn import_profile(&self, user_id: &str, raw: &RawProfile) -> Result<UserProfile> {
        let validated = validate_imported_profile(raw)?;
        info!(user_id, activity_level = validated.activity_level.as_str(), "importing profile");
        self.store_profile(user_id, validated).await
    }

    async fn store_profile(&self, user_id: &str, validated: ValidatedProfile) -> Result<UserProfile> {
        let profile = match self.store.load_profile(user_id).await? {
            Some(existing) => existing.update(validated),
            None => UserProfile::create(validated),
        };
        self.store.save_profile(user_id, &profile).await?;
        info!(
            user_id,
            daily_calories = profile.daily_calories(),
            daily_protein = profile.daily_protein(),
            "saved profile"
        );
        Ok(profile)
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        self.store
            .load_profile(user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("profile for {user_id}")))
    }

    /// Recompute targets from the stored biometrics and persist.
    pub async fn recalculate(&self, user_id: &str) -> Result<UserProfile> {
        let mut profile = self.profile(user_id).await?;
        profile.recalculate();
        self.store.save_profile(user_id, &profile).await?;
        Ok(profile)
    }

    /// The log for `date`, or an empty one if nothing was logged yet.
    pub async fn daily_log(&self, user_id: &str, date: NaiveDate) -> Result<DailyActivityLog> {
        Ok(self
            .store
            .load_log(user_id, date)
            .await?
            .unwrap_or_else(|| DailyActivityLog::empty(date)))
    }

    pub async fn add_food(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        raw: &RawFoodEntry,
    ) -> Result<FoodEntry> {
        let food = validate_food(raw)?;
        let date = self.today(now);
        let mut log = self.daily_log(user_id, date).await?;
        let entry = FoodEntry {
            id: Uuid::new_v4().to_string(),
            name: food.name,
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            logged_at: self.day_boundary.time_of(now),
        };
        log.foods.push(entry.clone());
        self.store.save_log(user_id, &log).await?;
        info!(user_id, %date, entry_id = %entry.id, calories = entry.calories, "logged food");
        Ok(entry)
    }

    pub async fn delete_food(&self, user_id: &str, date: NaiveDate, entry_id: &str) -> Result<()> {
        let mut log = self.daily_log(user_id, date).await?;
        if !log.remove_food(entry_id) {
            return Err(Error::not_found(format!("food entry {entry_id}")));
        }
        self.store.save_log(user_id, &log).await?;
        info!(user_id, %date, entry_id, "deleted food");
        Ok(())
    }

    pub async fn add_workout(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        raw: &RawWorkoutEntry,
    ) -> Result<WorkoutEntry> {
        let workout = validate_workout(raw)?;
        let date = self.today(now);
        let mut log = self.daily_log(user_id, date).await?;
        let entry = WorkoutEntry {
            id: Uuid::new_v4().to_string(),
            name: workout.name,
            duration_min: workout.duration_min,
            calories_burned: workout.calories_burned,
            logged_at: self.day_boundary.time_of(now),
        };
        log.workouts.push(entry.clone());
        self.store.save_log(user_id, &log).await?;
        info!(user_id, %date, entry_id = %entry.id, minutes = entry.duration_min, "logged workout");
        Ok(entry)
    }

    pub async fn delete_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry_id: &str,
    ) -> Result<()> {
        let mut log = self.daily_log(user_id, date).await?;
        if !log.remove_workout(entry_id) {
            return Err(Error::not_found(format!("workout entry {entry_id}")));
        }
        self.store.save_log(user_id, &log).await?;
        info!(user_id, %date, entry_id, "deleted workout");
        Ok(())
    }

    /// Apply stat edits to the log for `date`.
    pub async fn update_stats(
        &self,
        user_id: &str,
        date: NaiveDate,
        raw: &RawDailyStats,
    ) -> Result<DailyActivityLog> {
        let update = validate_stats(raw)?;
        let mut log = self.daily_log(user_id, date).await?;
        if let Some(steps) = update.steps {
            log.steps = steps;
        }
        if let Some(water_ml) = update.water_ml {
            log.water_ml = water_ml;
        }
        if let Some(sleep_hours) = update.sleep_hours {
            log.sleep_hours = sleep_hours;
        }
        if let Some(weight_kg) = update.weight_kg {
            log.weight_kg = Some(weight_kg);
        }
        self.store.save_log(user_id, &log).await?;
        Ok(log)
    }

    /// Dashboard metrics for the day `now` falls on.
    pub async fn dashboard(&self, user_id: &str, now: DateTime<Utc>) -> Result<Dashboard> {
        let profile = self.profile(user_id).await?;
        let log = self.daily_log(user_id, self.today(now)).await?;
        Ok(Dashboard::build(&profile, &log, self.workout_target_min, now))
    }
}

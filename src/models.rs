use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::goals::compute_targets;

/// Biological sex used by the Mifflin-St Jeor equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Strict, case-insensitive parse. Unknown values are `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Self-reported activity level, mapped to a TDEE multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Strict parse of the stored identifiers (`very_active` etc.).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sedentary" => Some(Self::Sedentary),
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "active" => Some(Self::Active),
            "very_active" => Some(Self::VeryActive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }
}

/// Direction of the calorie target relative to TDEE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Loss,
    Gain,
    #[default]
    Maintenance,
}

/// Values derived from the base biometrics. Never edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetabolicTargets {
    /// kcal/day at rest
    pub bmr: i64,
    /// kcal/day including activity
    pub tdee: i64,
    /// kcal/day to eat for the goal
    pub daily_calories: i64,
    /// grams/day
    pub daily_protein: i64,
}

/// A profile that passed validation, before targets are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedProfile {
    pub name: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    /// Free-text goal as the user typed it
    pub fitness_goal: String,
    pub target_date: Option<NaiveDate>,
}

/// Stored user profile with its derived metabolic targets.
///
/// Fields are read through getters. The only ways to change a profile are
/// [`UserProfile::create`], [`UserProfile::update`] and
/// [`UserProfile::recalculate`], so the targets always match the biometrics.
///
/// ```compile_fail
/// # fn bump(profile: &mut reddyfit::models::UserProfile) {
/// profile.weight_kg = 120.0;
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    name: String,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    target_weight_kg: f64,
    /// Weight at first save; the baseline for progress
    start_weight_kg: f64,
    gender: Gender,
    activity_level: ActivityLevel,
    goal: Goal,
    fitness_goal: String,
    target_date: Option<NaiveDate>,
    targets: MetabolicTargets,
}

impl UserProfile {
    /// Build a new profile. The current weight becomes the start weight.
    pub fn create(validated: ValidatedProfile) -> Self {
        let start_weight_kg = validated.weight_kg;
        Self::with_start_weight(validated, start_weight_kg)
    }

    /// Replace the base fields with `validated`, keeping the start weight,
    /// and recompute targets.
    pub fn update(&self, validated: ValidatedProfile) -> Self {
        Self::with_start_weight(validated, self.start_weight_kg)
    }

    /// Recompute targets from the stored base fields.
    pub fn recalculate(&mut self) {
        self.targets = compute_targets(&self.base());
    }

    /// The base fields, as they would be re-submitted on an edit.
    pub fn base(&self) -> ValidatedProfile {
        ValidatedProfile {
            name: self.name.clone(),
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            target_weight_kg: self.target_weight_kg,
            gender: self.gender,
            activity_level: self.activity_level,
            goal: self.goal,
            fitness_goal: self.fitness_goal.clone(),
            target_date: self.target_date,
        }
    }

    fn with_start_weight(validated: ValidatedProfile, start_weight_kg: f64) -> Self {
        let targets = compute_targets(&validated);
        tracing::debug!(
            bmr = targets.bmr,
            tdee = targets.tdee,
            daily_calories = targets.daily_calories,
            daily_protein = targets.daily_protein,
            "computed metabolic targets"
        );
        Self {
            name: validated.name,
            age: validated.age,
            height_cm: validated.height_cm,
            weight_kg: validated.weight_kg,
            target_weight_kg: validated.target_weight_kg,
            start_weight_kg,
            gender: validated.gender,
            activity_level: validated.activity_level,
            goal: validated.goal,
            fitness_goal: validated.fitness_goal,
            target_date: validated.target_date,
            targets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn target_weight_kg(&self) -> f64 {
        self.target_weight_kg
    }

    pub fn start_weight_kg(&self) -> f64 {
        self.start_weight_kg
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Free-text goal as the user typed it
    pub fn fitness_goal(&self) -> &str {
        &self.fitness_goal
    }

    pub fn target_date(&self) -> Option<NaiveDate> {
        self.target_date
    }

    pub fn targets(&self) -> &MetabolicTargets {
        &self.targets
    }

    pub fn bmr(&self) -> i64 {
        self.targets.bmr
    }

    pub fn tdee(&self) -> i64 {
        self.targets.tdee
    }

    pub fn daily_calories(&self) -> i64 {
        self.targets.daily_calories
    }

    pub fn daily_protein(&self) -> i64 {
        self.targets.daily_protein
    }
}

/// One meal or snack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    /// kcal
    pub calories: u32,
    /// grams
    pub protein: u32,
    /// grams
    pub carbs: u32,
    /// grams
    pub fat: u32,
    pub logged_at: NaiveTime,
}

/// One workout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: String,
    pub name: String,
    pub duration_min: u32,
    /// kcal
    pub calories_burned: u32,
    pub logged_at: NaiveTime,
}

/// Everything logged for one user on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivityLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub water_ml: u32,
    #[serde(default)]
    pub sleep_hours: f64,
    /// Weigh-in for the day, if any
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
    #[serde(default)]
    pub workouts: Vec<WorkoutEntry>,
}

impl DailyActivityLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0,
            water_ml: 0,
            sleep_hours: 0.0,
            weight_kg: None,
            foods: Vec::new(),
            workouts: Vec::new(),
        }
    }

    /// Remove a food entry by id. Returns whether it existed.
    pub fn remove_food(&mut self, id: &str) -> bool {
        let before = self.foods.len();
        self.foods.retain(|f| f.id != id);
        self.foods.len() != before
    }

    /// Remove a workout entry by id. Returns whether it existed.
    pub fn remove_workout(&mut self, id: &str) -> bool {
        let before = self.workouts.len();
        self.workouts.retain(|w| w.id != id);
        self.workouts.len() != before
    }
}

/// Profile form as submitted, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    pub name: String,
    pub age: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub target_weight_kg: String,
    pub gender: String,
    pub activity_level: String,
    #[serde(default)]
    pub fitness_goal: String,
    /// ISO date (`YYYY-MM-DD`); empty means none
    #[serde(default)]
    pub target_date: String,
}

/// Food form as submitted. Empty macro fields default to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFoodEntry {
    pub name: String,
    pub calories: String,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub fat: String,
}

/// Workout form as submitted. Empty burned calories default to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWorkoutEntry {
    pub name: String,
    pub duration_min: String,
    #[serde(default)]
    pub calories_burned: String,
}

/// Daily stat edits. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDailyStats {
    pub steps: Option<String>,
    pub water_ml: Option<String>,
    pub sleep_hours: Option<String>,
    pub weight_kg: Option<String>,
}

/// Validated food fields, ready to be stamped with an id and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFood {
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Validated workout fields, ready to be stamped with an id and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkout {
    pub name: String,
    pub duration_min: u32,
    pub calories_burned: u32,
}

/// Validated stat edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsUpdate {
    pub steps: Option<u32>,
    pub water_ml: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub weight_kg: Option<f64>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DailyActivityLog, UserProfile};

/// Share of the protein target that counts as on track.
pub const PROTEIN_GOOD_RATIO: f64 = 0.8;
/// Absorbs float error when comparing against `PROTEIN_GOOD_RATIO * target`.
const PROTEIN_EPSILON: f64 = 1e-9;
/// Daily workout minutes used when none is configured.
pub const DEFAULT_WORKOUT_TARGET_MIN: u32 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalorieStatus {
    Good,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinStatus {
    Good,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    Good,
    Pending,
}

/// Progress from start weight towards target weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum WeightProgress {
    /// Percentage in `0..=100`.
    Percent(f64),
    /// Target equals start weight but the user has moved away from it.
    GoalEqualsStart,
}

impl WeightProgress {
    pub fn percent(self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(p),
            Self::GoalEqualsStart => None,
        }
    }
}

pub fn total_calories(log: &DailyActivityLog) -> i64 {
    log.foods.iter().map(|f| i64::from(f.calories)).sum()
}

pub fn total_protein(log: &DailyActivityLog) -> i64 {
    log.foods.iter().map(|f| i64::from(f.protein)).sum()
}

pub fn total_carbs(log: &DailyActivityLog) -> i64 {
    log.foods.iter().map(|f| i64::from(f.carbs)).sum()
}

pub fn total_fat(log: &DailyActivityLog) -> i64 {
    log.foods.iter().map(|f| i64::from(f.fat)).sum()
}

pub fn total_calories_burned(log: &DailyActivityLog) -> i64 {
    log.workouts
        .iter()
        .map(|w| i64::from(w.calories_burned))
        .sum()
}

pub fn total_workout_minutes(log: &DailyActivityLog) -> i64 {
    log.workouts.iter().map(|w| i64::from(w.duration_min)).sum()
}

/// Eaten minus burned. Negative when more was burned.
pub fn net_calories(log: &DailyActivityLog) -> i64 {
    total_calories(log) - total_calories_burned(log)
}

/// Calories left in today's budget. Negative when over budget.
pub fn remaining_calories(profile: &UserProfile, log: &DailyActivityLog) -> i64 {
    profile.daily_calories() - total_calories(log)
}

pub fn calorie_status(remaining: i64) -> CalorieStatus {
    if remaining >= 0 {
        CalorieStatus::Good
    } else {
        CalorieStatus::Over
    }
}

// gram totals stay far below 2^52
#[allow(clippy::cast_precision_loss)]
pub fn protein_status(total_protein: i64, target: i64) -> ProteinStatus {
    if total_protein as f64 + PROTEIN_EPSILON >= PROTEIN_GOOD_RATIO * target as f64 {
        ProteinStatus::Good
    } else {
        ProteinStatus::Low
    }
}

pub fn workout_status(total_duration_min: i64, target_min: i64) -> WorkoutStatus {
    if total_duration_min >= target_min {
        WorkoutStatus::Good
    } else {
        WorkoutStatus::Pending
    }
}

/// How far the user has moved from `start` towards `target`, clamped to
/// `0..=100`. Works for both losing and gaining.
pub fn weight_progress_percent(start: f64, current: f64, target: f64) -> WeightProgress {
    let moved = start - current;
    let total = start - target;
    if total.abs() < f64::EPSILON {
        return if moved <= 0.0 {
            WeightProgress::Percent(100.0)
        } else {
            WeightProgress::GoalEqualsStart
        };
    }
    WeightProgress::Percent((moved / total * 100.0).clamp(0.0, 100.0))
}

/// Whole days from `now` until midnight UTC of `target`, rounded up.
/// Negative once the date has passed.
pub fn days_to_target(target: NaiveDate, now: DateTime<Utc>) -> i64 {
    let target_start = target.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (target_start - now).num_milliseconds();
    // ceil(millis / day) for either sign
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// Every derived metric shown on the dashboard for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub total_calories: i64,
    pub total_protein: i64,
    pub total_carbs: i64,
    pub total_fat: i64,
    pub total_calories_burned: i64,
    pub net_calories: i64,
    pub remaining_calories: i64,
    pub calorie_status: CalorieStatus,
    pub protein_target: i64,
    pub protein_status: ProteinStatus,
    pub workout_minutes: i64,
    pub workout_target_min: i64,
    pub workout_status: WorkoutStatus,
    pub steps: u32,
    pub water_ml: u32,
    pub sleep_hours: f64,
    pub current_weight_kg: f64,
    pub weight_progress: WeightProgress,
    pub days_to_target: Option<i64>,
}

impl Dashboard {
    /// Assemble the dashboard. The day's weigh-in, when present, is the
    /// current weight; otherwise the profile weight is.
    pub fn build(
        profile: &UserProfile,
        log: &DailyActivityLog,
        workout_target_min: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let remaining = remaining_calories(profile, log);
        let protein = total_protein(log);
        let minutes = total_workout_minutes(log);
        let target_min = i64::from(workout_target_min);
        let current_weight_kg = log.weight_kg.unwrap_or(profile.weight_kg());

        Self {
            date: log.date,
            total_calories: total_calories(log),
            total_protein: protein,
            total_carbs: total_carbs(log),
            total_fat: total_fat(log),
            total_calories_burned: total_calories_burned(log),
            net_calories: net_calories(log),
            remaining_calories: remaining,
            calorie_status: calorie_status(remaining),
            protein_target: profile.daily_protein(),
            protein_status: protein_status(protein, profile.daily_protein()),
            workout_minutes: minutes,
            workout_target_min: target_min,
            workout_status: workout_status(minutes, target_min),
            steps: log.steps,
            water_ml: log.water_ml,
            sleep_hours: log.sleep_hours,
            current_weight_kg,
            weight_progress: weight_progress_percent(
                profile.start_weight_kg(),
                current_weight_kg,
                profile.target_weight_kg(),
            ),
            days_to_target: profile.target_date().map(|d| days_to_target(d, now)),
        }
    }
}

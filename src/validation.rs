use chrono::NaiveDate;

use crate::error::{FieldViolation, ValidationError};
use crate::models::{
    ActivityLevel, Gender, Goal, NewFood, NewWorkout, RawDailyStats, RawFoodEntry, RawProfile,
    RawWorkoutEntry, StatsUpdate, ValidatedProfile,
};

pub const NAME_MAX_CHARS: usize = 100;
pub const GOAL_TEXT_MAX_CHARS: usize = 200;

pub const AGE_RANGE: (f64, f64) = (13.0, 120.0);
pub const HEIGHT_CM_RANGE: (f64, f64) = (50.0, 300.0);
pub const WEIGHT_KG_RANGE: (f64, f64) = (20.0, 300.0);

pub const FOOD_CALORIES_RANGE: (f64, f64) = (0.0, 10_000.0);
pub const MACRO_GRAMS_RANGE: (f64, f64) = (0.0, 1_000.0);
pub const WORKOUT_DURATION_RANGE: (f64, f64) = (1.0, 600.0);
pub const WORKOUT_CALORIES_RANGE: (f64, f64) = (0.0, 5_000.0);

pub const STEPS_RANGE: (f64, f64) = (0.0, 100_000.0);
pub const WATER_ML_RANGE: (f64, f64) = (0.0, 20_000.0);
pub const SLEEP_HOURS_RANGE: (f64, f64) = (0.0, 24.0);

/// Collects one violation per bad field instead of stopping at the first.
#[derive(Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }

    fn name(&mut self, field: &'static str, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            self.reject(field, "is required");
            return None;
        }
        if len > NAME_MAX_CHARS {
            self.reject(
                field,
                format!("must be at most {NAME_MAX_CHARS} characters"),
            );
            return None;
        }
        Some(trimmed.to_string())
    }

    fn number(&mut self, field: &'static str, raw: &str, (min, max): (f64, f64)) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.reject(field, "is required");
            return None;
        }
        let Ok(value) = trimmed.parse::<f64>() else {
            self.reject(field, "must be a number");
            return None;
        };
        if !value.is_finite() {
            self.reject(field, "must be a finite number");
            return None;
        }
        if value < min || value > max {
            self.reject(field, format!("must be between {min} and {max}"));
            return None;
        }
        Some(value)
    }

    // range bounds are within u32
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn whole(&mut self, field: &'static str, raw: &str, range: (f64, f64)) -> Option<u32> {
        let value = self.number(field, raw, range)?;
        if value.fract() != 0.0 {
            self.reject(field, "must be a whole number");
            return None;
        }
        Some(value as u32)
    }

    /// Blank input means zero.
    fn whole_or_zero(&mut self, field: &'static str, raw: &str, range: (f64, f64)) -> Option<u32> {
        if raw.trim().is_empty() {
            return Some(0);
        }
        self.whole(field, raw, range)
    }

    fn number_or_zero(&mut self, field: &'static str, raw: &str, range: (f64, f64)) -> Option<f64> {
        if raw.trim().is_empty() {
            return Some(0.0);
        }
        self.number(field, raw, range)
    }
}

/// Validate and normalise a submitted profile form.
///
/// Gender and activity level are matched strictly; an unknown value is a
/// violation, never a default.
///
/// # Errors
///
/// Returns every field violation found.
pub fn validate_profile(raw: &RawProfile) -> Result<ValidatedProfile, ValidationError> {
    let mut check = Checker::default();

    let name = check.name("name", &raw.name);
    let age = check.whole("age", &raw.age, AGE_RANGE);
    let height_cm = check.number("height_cm", &raw.height_cm, HEIGHT_CM_RANGE);
    let weight_kg = check.number("weight_kg", &raw.weight_kg, WEIGHT_KG_RANGE);
    let target_weight_kg =
        check.number("target_weight_kg", &raw.target_weight_kg, WEIGHT_KG_RANGE);

    let gender = Gender::parse(&raw.gender);
    if gender.is_none() {
        check.reject("gender", "must be one of: male, female");
    }
    let activity_level = ActivityLevel::parse(&raw.activity_level);
    if activity_level.is_none() {
        check.reject(
            "activity_level",
            "must be one of: sedentary, light, moderate, active, very_active",
        );
    }

    let fitness_goal = raw.fitness_goal.trim().to_string();
    if fitness_goal.chars().count() > GOAL_TEXT_MAX_CHARS {
        check.reject(
            "fitness_goal",
            format!("must be at most {GOAL_TEXT_MAX_CHARS} characters"),
        );
    }

    let target_date = match raw.target_date.trim() {
        "" => Some(None),
        text => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => Some(Some(date)),
            Err(_) => {
                check.reject("target_date", "must be a date in YYYY-MM-DD format");
                None
            }
        },
    };

    match (
        name,
        age,
        height_cm,
        weight_kg,
        target_weight_kg,
        gender,
        activity_level,
        target_date,
    ) {
        (
            Some(name),
            Some(age),
            Some(height_cm),
            Some(weight_kg),
            Some(target_weight_kg),
            Some(gender),
            Some(activity_level),
            Some(target_date),
        ) if check.is_clean() => Ok(ValidatedProfile {
            name,
            age,
            height_cm,
            weight_kg,
            target_weight_kg,
            gender,
            activity_level,
            goal: Goal::from_text(&fitness_goal),
            fitness_goal,
            target_date,
        }),
        _ => Err(check.into_error()),
    }
}

/// Validate a food form.
///
/// # Errors
///
/// Returns every field violation found.
pub fn validate_food(raw: &RawFoodEntry) -> Result<NewFood, ValidationError> {
    let mut check = Checker::default();

    let name = check.name("name", &raw.name);
    let calories = check.whole("calories", &raw.calories, FOOD_CALORIES_RANGE);
    let protein = check.whole_or_zero("protein", &raw.protein, MACRO_GRAMS_RANGE);
    let carbs = check.whole_or_zero("carbs", &raw.carbs, MACRO_GRAMS_RANGE);
    let fat = check.whole_or_zero("fat", &raw.fat, MACRO_GRAMS_RANGE);

    match (name, calories, protein, carbs, fat) {
        (Some(name), Some(calories), Some(protein), Some(carbs), Some(fat))
            if check.is_clean() =>
        {
            Ok(NewFood {
                name,
                calories,
                protein,
                carbs,
                fat,
            })
        }
        _ => Err(check.into_error()),
    }
}

/// Validate a workout form.
///
/// # Errors
///
/// Returns every field violation found.
pub fn validate_workout(raw: &RawWorkoutEntry) -> Result<NewWorkout, ValidationError> {
    let mut check = Checker::default();

    let name = check.name("name", &raw.name);
    let duration_min = check.whole("duration_min", &raw.duration_min, WORKOUT_DURATION_RANGE);
    let calories_burned =
        check.whole_or_zero("calories_burned", &raw.calories_burned, WORKOUT_CALORIES_RANGE);

    match (name, duration_min, calories_burned) {
        (Some(name), Some(duration_min), Some(calories_burned)) if check.is_clean() => {
            Ok(NewWorkout {
                name,
                duration_min,
                calories_burned,
            })
        }
        _ => Err(check.into_error()),
    }
}

/// Validate daily stat edits. Absent fields stay absent.
///
/// Blank steps, water or sleep mean zero. A blank weight is treated as no
/// weigh-in, so the stored one is kept.
///
/// # Errors
///
/// Returns every field violation found.
pub fn validate_stats(raw: &RawDailyStats) -> Result<StatsUpdate, ValidationError> {
    let mut check = Checker::default();

    let update = StatsUpdate {
        steps: raw
            .steps
            .as_deref()
            .and_then(|s| check.whole_or_zero("steps", s, STEPS_RANGE)),
        water_ml: raw
            .water_ml
            .as_deref()
            .and_then(|s| check.whole_or_zero("water_ml", s, WATER_ML_RANGE)),
        sleep_hours: raw
            .sleep_hours
            .as_deref()
            .and_then(|s| check.number_or_zero("sleep_hours", s, SLEEP_HOURS_RANGE)),
        weight_kg: raw
            .weight_kg
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| check.number("weight_kg", s, WEIGHT_KG_RANGE)),
    };

    if check.is_clean() {
        Ok(update)
    } else {
        Err(check.into_error())
    }
}

/// Validate a profile saved before activity levels were checked.
///
/// An unrecognised activity level becomes moderate. Every other field is
/// held to the same rules as [`validate_profile`].
///
/// # Errors
///
/// Returns every remaining field violation.
pub fn validate_imported_profile(raw: &RawProfile) -> Result<ValidatedProfile, ValidationError> {
    let activity_level = ActivityLevel::parse_lenient(&raw.activity_level);
    validate_profile(&RawProfile {
        activity_level: activity_level.as_str().to_string(),
        ..raw.clone()
    })
}

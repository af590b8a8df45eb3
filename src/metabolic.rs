use crate::models::{ActivityLevel, Gender};

const WEIGHT_COEF: f64 = 10.0;
const HEIGHT_COEF: f64 = 6.25;
const AGE_COEF: f64 = -5.0;
const MALE_CONSTANT: f64 = 5.0;
const FEMALE_CONSTANT: f64 = -161.0;

impl ActivityLevel {
    /// TDEE multiplier for this level.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }

    /// Parse an identifier from data saved before levels were validated.
    /// Anything unrecognised counts as moderate.
    pub fn parse_lenient(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            tracing::debug!(activity_level = value, "unrecognised activity level, using moderate");
            Self::Moderate
        })
    }
}

/// Unrounded Mifflin-St Jeor BMR in kcal/day (Mifflin et al., 1990).
///
/// - male: `10 * weight_kg + 6.25 * height_cm - 5 * age + 5`
/// - female: `10 * weight_kg + 6.25 * height_cm - 5 * age - 161`
///
/// Non-finite input gives non-finite output; callers validate first.
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let constant = match gender {
        Gender::Male => MALE_CONSTANT,
        Gender::Female => FEMALE_CONSTANT,
    };
    WEIGHT_COEF * weight_kg + HEIGHT_COEF * height_cm + AGE_COEF * f64::from(age) + constant
}

/// BMR rounded to the nearest kcal.
pub fn estimate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    mifflin_st_jeor(weight_kg, height_cm, age, gender).round()
}

/// TDEE rounded to the nearest kcal.
pub fn estimate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    (bmr * activity_level.multiplier()).round()
}

use crate::metabolic::{estimate_bmr, estimate_tdee};
use crate::models::{Goal, MetabolicTargets, ValidatedProfile};

/// Fraction of TDEE eaten when losing weight (20% deficit).
pub const LOSS_FACTOR: f64 = 0.8;
/// Fraction of TDEE eaten when gaining weight (10% surplus).
pub const GAIN_FACTOR: f64 = 1.1;
/// Grams of protein per kg of bodyweight, independent of goal.
pub const PROTEIN_G_PER_KG: f64 = 2.0;

impl Goal {
    /// Classify free-text goals such as "Weight Loss" or "lean bulk".
    ///
    /// Loss keywords win when both kinds appear. Anything else is maintenance.
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("loss") || text.contains("cut") {
            Self::Loss
        } else if text.contains("gain") || text.contains("bulk") {
            Self::Gain
        } else {
            Self::Maintenance
        }
    }

    pub fn calorie_factor(self) -> f64 {
        match self {
            Self::Loss => LOSS_FACTOR,
            Self::Gain => GAIN_FACTOR,
            Self::Maintenance => 1.0,
        }
    }
}

/// Calorie target for `goal`, rounded to the nearest kcal.
pub fn daily_calories(tdee: f64, goal: Goal) -> f64 {
    match goal {
        Goal::Maintenance => tdee,
        _ => (tdee * goal.calorie_factor()).round(),
    }
}

/// Protein target in grams, rounded.
pub fn daily_protein(weight_kg: f64) -> f64 {
    (weight_kg * PROTEIN_G_PER_KG).round()
}

/// Compute every derived target from validated biometrics.
// validated ranges keep every value far inside i64
#[allow(clippy::cast_possible_truncation)]
pub fn compute_targets(profile: &ValidatedProfile) -> MetabolicTargets {
    let bmr = estimate_bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.gender,
    );
    let tdee = estimate_tdee(bmr, profile.activity_level);
    MetabolicTargets {
        bmr: bmr as i64,
        tdee: tdee as i64,
        daily_calories: daily_calories(tdee, profile.goal) as i64,
        daily_protein: daily_protein(profile.weight_kg) as i64,
    }
}

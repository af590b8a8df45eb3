use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Goal, RawFoodEntry, UserProfile};

/// A hosted model that completes prompts.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Result of interpreting a provider reply.
///
/// Transport errors and unparseable replies both become `Fallback` with a
/// logged warning; nothing in this module returns an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> Analysis<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }
}

/// Nutrition estimate for a described or photographed meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    /// 1 (poor) to 5 (excellent)
    #[serde(default = "default_quality", deserialize_with = "quality_from_number")]
    pub quality_score: u8,
    #[serde(default)]
    pub foods: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

fn default_quality() -> u8 {
    3
}

/// Providers send scores like `4.5`; round, then clamp to 1..=5.
// clamped before the cast
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quality_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let score = f64::deserialize(deserializer)?;
    Ok(score.round().clamp(1.0, 5.0) as u8)
}

impl Default for MealAnalysis {
    fn default() -> Self {
        Self {
            calories: 400.0,
            protein: 20.0,
            carbs: 45.0,
            fats: 15.0,
            quality_score: 3,
            foods: vec!["Mixed meal".into()],
            recommendations: vec![
                "We couldn't analyze this meal precisely. Adjust the values if you know them."
                    .into(),
            ],
        }
    }
}

impl MealAnalysis {
    /// Pre-filled food form for logging this meal.
    pub fn to_food_form(&self) -> RawFoodEntry {
        let name = if self.foods.is_empty() {
            "Meal".to_string()
        } else {
            self.foods.join(", ")
        };
        let grams = |v: f64| format!("{}", v.max(0.0).round());
        RawFoodEntry {
            name: name.chars().take(crate::validation::NAME_MAX_CHARS).collect(),
            calories: grams(self.calories),
            protein: grams(self.protein),
            carbs: grams(self.carbs),
            fat: grams(self.fats),
        }
    }
}

/// Body-composition estimate from a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyAnalysis {
    /// Percent
    pub body_fat: f64,
    #[serde(default)]
    pub muscle_mass: String,
    #[serde(default)]
    pub posture: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl Default for BodyAnalysis {
    fn default() -> Self {
        Self {
            body_fat: 20.0,
            muscle_mass: "Unable to assess".into(),
            posture: "Unable to assess".into(),
            recommendations: vec![
                "Try another photo in good lighting, facing the camera.".into(),
            ],
        }
    }
}

/// Profile facts a provider needs to personalise a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingContext {
    pub name: String,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    pub goal: Goal,
    pub fitness_goal: String,
    pub daily_calories: i64,
    pub daily_protein: i64,
}

impl From<&UserProfile> for CoachingContext {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name().to_string(),
            weight_kg: profile.weight_kg(),
            target_weight_kg: profile.target_weight_kg(),
            goal: profile.goal(),
            fitness_goal: profile.fitness_goal().to_string(),
            daily_calories: profile.daily_calories(),
            daily_protein: profile.daily_protein(),
        }
    }
}

/// Prompt with the serialized user context prepended.
pub fn build_prompt(profile: &UserProfile, instructions: &str) -> String {
    let context = serde_json::to_string(&CoachingContext::from(profile))
        .unwrap_or_else(|_| String::from("{}"));
    format!("User context: {context}\n\n{instructions}")
}

const MEAL_INSTRUCTIONS: &str = "Estimate the nutrition of this meal. Reply with only a JSON object \
with keys calories, protein, carbs, fats (numbers), qualityScore (1-5), foods (array of strings) \
and recommendations (array of strings).\n\nMeal: ";

const BODY_INSTRUCTIONS: &str = "Assess body composition from the attached photo. Reply with only \
a JSON object with keys bodyFat (percent), muscleMass, posture (strings) and recommendations \
(array of strings).\n\nPhoto: ";

fn parse_or_default<T: DeserializeOwned + Default>(text: &str, kind: &str) -> Analysis<T> {
    let Some(start) = text.find('{') else {
        tracing::warn!(kind, "provider reply contained no JSON object, using fallback");
        return Analysis::Fallback(T::default());
    };
    // Only the first value is read; whatever follows it is left alone.
    let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<T>();
    match values.next() {
        Some(Ok(value)) => Analysis::Parsed(value),
        Some(Err(e)) => {
            tracing::warn!(kind, error = %e, "unparseable provider reply, using fallback");
            Analysis::Fallback(T::default())
        }
        None => {
            tracing::warn!(kind, "provider reply contained no JSON object, using fallback");
            Analysis::Fallback(T::default())
        }
    }
}

/// Interpret a meal-analysis reply.
pub fn parse_meal_analysis(text: &str) -> Analysis<MealAnalysis> {
    match parse_or_default::<MealAnalysis>(text, "meal") {
        Analysis::Parsed(meal) if !meal.calories.is_finite() || meal.calories < 0.0 => {
            tracing::warn!(calories = meal.calories, "implausible calories, using fallback");
            Analysis::Fallback(MealAnalysis::default())
        }
        other => other,
    }
}

/// Interpret a body-analysis reply.
pub fn parse_body_analysis(text: &str) -> Analysis<BodyAnalysis> {
    match parse_or_default::<BodyAnalysis>(text, "body") {
        Analysis::Parsed(body) if !(0.0..=100.0).contains(&body.body_fat) => {
            tracing::warn!(body_fat = body.body_fat, "implausible body fat, using fallback");
            Analysis::Fallback(BodyAnalysis::default())
        }
        other => other,
    }
}

/// Ask the provider to analyse a meal description.
pub async fn analyze_meal<P: AiProvider + ?Sized>(
    provider: &P,
    profile: &UserProfile,
    description: &str,
) -> Analysis<MealAnalysis> {
    let prompt = build_prompt(profile, &format!("{MEAL_INSTRUCTIONS}{description}"));
    match provider.complete(&prompt).await {
        Ok(reply) => parse_meal_analysis(&reply),
        Err(e) => {
            tracing::warn!(error = %e, "meal analysis request failed, using fallback");
            Analysis::Fallback(MealAnalysis::default())
        }
    }
}

/// Ask the provider to analyse a body photo, passed as an opaque reference.
pub async fn analyze_body<P: AiProvider + ?Sized>(
    provider: &P,
    profile: &UserProfile,
    photo_ref: &str,
) -> Analysis<BodyAnalysis> {
    let prompt = build_prompt(profile, &format!("{BODY_INSTRUCTIONS}{photo_ref}"));
    match provider.complete(&prompt).await {
        Ok(reply) => parse_body_analysis(&reply),
        Err(e) => {
            tracing::warn!(error = %e, "body analysis request failed, using fallback");
            Analysis::Fallback(BodyAnalysis::default())
        }
    }
}

pub const COACH_FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach your coach right now. Please try again in a moment.";

/// Free-text coaching reply.
pub async fn coach<P: AiProvider + ?Sized>(
    provider: &P,
    profile: &UserProfile,
    message: &str,
) -> Analysis<String> {
    let prompt = build_prompt(
        profile,
        &format!("You are a friendly fitness coach. Answer the user.\n\nUser: {message}"),
    );
    match provider.complete(&prompt).await {
        Ok(reply) if !reply.trim().is_empty() => Analysis::Parsed(reply.trim().to_string()),
        Ok(_) => {
            tracing::warn!("empty coaching reply, using fallback");
            Analysis::Fallback(COACH_FALLBACK_REPLY.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "coaching request failed, using fallback");
            Analysis::Fallback(COACH_FALLBACK_REPLY.to_string())
        }
    }
}

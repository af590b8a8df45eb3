use anyhow::anyhow;
use async_trait::async_trait;
use reddyfit::ai::*;
use reddyfit::models::{ActivityLevel, Gender, Goal, UserProfile, ValidatedProfile};
use reddyfit::validation::validate_food;
use std::sync::Mutex;

/// Replies with a canned answer and records the prompt it was given.
struct CannedProvider {
    reply: anyhow::Result<String>,
    last_prompt: Mutex<Option<String>>,
}

impl CannedProvider {
    fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(anyhow!("503 Service Unavailable")),
            last_prompt: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AiProvider for CannedProvider {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(anyhow!("{e}")),
        }
    }
}

fn profile() -> UserProfile {
    UserProfile::create(ValidatedProfile {
        name: "Asha".into(),
        age: 25,
        height_cm: 175.0,
        weight_kg: 75.0,
        target_weight_kg: 70.0,
        gender: Gender::Female,
        activity_level: ActivityLevel::Light,
        goal: Goal::Loss,
        fitness_goal: "lose 5kg".into(),
        target_date: None,
    })
}

#[test]
fn parses_json_wrapped_in_prose() {
    let reply = r#"Sure! Here is the analysis:
```json
{"calories": 520, "protein": 32.5, "carbs": 60, "fats": 14, "qualityScore": 4,
 "foods": ["chicken", "rice"], "recommendations": ["add greens"]}
```"#;
    let analysis = parse_meal_analysis(reply);
    assert!(!analysis.is_fallback());
    let meal = analysis.into_inner();
    assert_eq!(meal.calories, 520.0);
    assert_eq!(meal.protein, 32.5);
    assert_eq!(meal.quality_score, 4);
    assert_eq!(meal.foods, ["chicken", "rice"]);
}

#[test]
fn quality_score_is_clamped() {
    let meal = parse_meal_analysis(r#"{"calories": 100, "qualityScore": 9}"#).into_inner();
    assert_eq!(meal.quality_score, 5);
    let meal = parse_meal_analysis(r#"{"calories": 100, "qualityScore": 0}"#).into_inner();
    assert_eq!(meal.quality_score, 1);
}

#[test]
fn fractional_quality_score_is_rounded() {
    let meal = parse_meal_analysis(r#"{"calories": 520, "qualityScore": 4.5}"#);
    assert!(!meal.is_fallback());
    assert_eq!(meal.value().quality_score, 5);

    let meal = parse_meal_analysis(r#"{"calories": 520, "qualityScore": 2.4}"#).into_inner();
    assert_eq!(meal.quality_score, 2);
    let meal = parse_meal_analysis(r#"{"calories": 520, "qualityScore": -3.5}"#).into_inner();
    assert_eq!(meal.quality_score, 1);
}

#[test]
fn prose_after_the_object_is_ignored() {
    let reply = r#"{"calories": 310, "protein": 18, "foods": ["omelette"]}
Note: portion sizes vary, e.g. {2 eggs} vs {3 eggs}."#;
    let analysis = parse_meal_analysis(reply);
    assert!(!analysis.is_fallback());
    assert_eq!(analysis.value().calories, 310.0);
    assert_eq!(analysis.value().foods, ["omelette"]);

    let body = parse_body_analysis(r#"Result: {"bodyFat": 22} (estimate, see {notes})"#);
    assert_eq!(
        body,
        Analysis::Parsed(BodyAnalysis {
            body_fat: 22.0,
            muscle_mass: String::new(),
            posture: String::new(),
            recommendations: Vec::new(),
        })
    );
}

#[test]
fn malformed_reply_uses_fallback() {
    let analysis = parse_meal_analysis("I can't see any food in this picture.");
    assert_eq!(analysis, Analysis::Fallback(MealAnalysis::default()));

    let analysis = parse_meal_analysis(r#"{"calories": "lots"}"#);
    assert!(analysis.is_fallback());

    let analysis = parse_meal_analysis(r#"{"calories": -50}"#);
    assert!(analysis.is_fallback());

    let analysis = parse_meal_analysis(r#"{"calories": 300, "protein": "#);
    assert!(analysis.is_fallback());
}

#[test]
fn body_analysis_parses_and_falls_back() {
    let parsed = parse_body_analysis(
        r#"{"bodyFat": 18.5, "muscleMass": "average", "posture": "upright", "recommendations": []}"#,
    );
    assert_eq!(parsed.value().body_fat, 18.5);
    assert!(!parsed.is_fallback());

    assert!(parse_body_analysis(r#"{"bodyFat": 140}"#).is_fallback());
    assert!(parse_body_analysis("").is_fallback());
}

#[test]
fn fallback_meal_is_loggable() {
    let form = MealAnalysis::default().to_food_form();
    let food = validate_food(&form).unwrap();
    assert_eq!(food.calories, 400);
    assert_eq!(food.protein, 20);
    assert_eq!(food.name, "Mixed meal");
}

#[test]
fn prompt_carries_profile_context() {
    let prompt = build_prompt(&profile(), "How am I doing?");
    assert!(prompt.contains("\"name\":\"Asha\""));
    assert!(prompt.contains("\"goal\":\"loss\""));
    assert!(prompt.contains(&format!("\"dailyCalories\":{}", profile().daily_calories())));
    assert!(prompt.ends_with("How am I doing?"));
}

#[tokio::test]
async fn analyze_meal_parses_provider_reply() {
    let provider = CannedProvider::ok(r#"{"calories": 250, "protein": 12, "foods": ["yogurt"]}"#);
    let analysis = analyze_meal(&provider, &profile(), "greek yogurt with honey").await;
    assert!(!analysis.is_fallback());
    assert_eq!(analysis.value().calories, 250.0);

    let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("greek yogurt with honey"));
}

#[tokio::test]
async fn provider_failures_never_escape() {
    let provider = CannedProvider::failing();
    let meal = analyze_meal(&provider, &profile(), "pizza").await;
    assert_eq!(meal, Analysis::Fallback(MealAnalysis::default()));

    let body = analyze_body(&provider, &profile(), "photo-123").await;
    assert_eq!(body, Analysis::Fallback(BodyAnalysis::default()));

    let reply = coach(&provider, &profile(), "motivate me").await;
    assert_eq!(reply, Analysis::Fallback(COACH_FALLBACK_REPLY.to_string()));
}

#[tokio::test]
async fn coach_returns_trimmed_text() {
    let provider = CannedProvider::ok("  Keep going, Asha!  \n");
    let reply = coach(&provider, &profile(), "motivate me").await;
    assert_eq!(reply, Analysis::Parsed("Keep going, Asha!".to_string()));
}

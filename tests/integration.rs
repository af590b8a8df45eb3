use chrono::{FixedOffset, TimeZone, Utc};
use reddyfit::config::{Config, DayBoundary};
use reddyfit::models::{RawDailyStats, RawFoodEntry, RawProfile, RawWorkoutEntry};
use reddyfit::progress::{CalorieStatus, WeightProgress, WorkoutStatus};
use reddyfit::store::MemoryStore;
use reddyfit::{Error, ReddyFitClient};

const USER: &str = "user-1";

fn get_credentials() -> Option<(String, String)> {
    dotenvy::dotenv().ok();
    let email = std::env::var("REDDYFIT_EMAIL").ok()?;
    let password = std::env::var("REDDYFIT_PASSWORD").ok()?;
    Some((email, password))
}

fn utc_client() -> ReddyFitClient<MemoryStore> {
    let config = Config {
        day_boundary: DayBoundary::Fixed(FixedOffset::east_opt(0).unwrap()),
        ..Config::default()
    };
    ReddyFitClient::new(MemoryStore::new(), &config)
}

fn raw_profile(weight: &str) -> RawProfile {
    RawProfile {
        name: "Asha".into(),
        age: "25".into(),
        height_cm: "175".into(),
        weight_kg: weight.into(),
        target_weight_kg: "70".into(),
        gender: "male".into(),
        activity_level: "moderate".into(),
        fitness_goal: "Weight Loss".into(),
        target_date: String::new(),
    }
}

fn meal(name: &str, calories: &str, protein: &str) -> RawFoodEntry {
    RawFoodEntry {
        name: name.into(),
        calories: calories.into(),
        protein: protein.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn profile_save_computes_targets() {
    let client = utc_client();
    let profile = client.save_profile(USER, &raw_profile("75")).await.unwrap();

    assert_eq!(profile.bmr(), 1724);
    assert_eq!(profile.tdee(), 2672);
    assert_eq!(profile.daily_calories(), 2138);
    assert_eq!(profile.daily_protein(), 150);
    assert_eq!(client.profile(USER).await.unwrap(), profile);
}

#[tokio::test]
async fn editing_weight_recomputes_and_keeps_start() {
    let client = utc_client();
    client.save_profile(USER, &raw_profile("80")).await.unwrap();
    let edited = client.save_profile(USER, &raw_profile("75")).await.unwrap();

    assert_eq!(edited.start_weight_kg(), 80.0);
    assert_eq!(edited.weight_kg(), 75.0);
    assert_eq!(edited.daily_protein(), 150);
    assert_eq!(client.recalculate(USER).await.unwrap(), edited);
}

#[tokio::test]
async fn import_reads_unknown_activity_as_moderate() {
    let client = utc_client();
    let mut raw = raw_profile("75");
    raw.activity_level = "gym most days".into();

    assert!(matches!(
        client.save_profile(USER, &raw).await,
        Err(Error::Validation(_))
    ));
    let imported = client.import_profile(USER, &raw).await.unwrap();
    assert_eq!(imported.tdee(), 2672);
    assert_eq!(imported.daily_calories(), 2138);
    assert_eq!(client.profile(USER).await.unwrap(), imported);
}

#[tokio::test]
async fn invalid_profile_is_not_saved() {
    let client = utc_client();
    let mut raw = raw_profile("75");
    raw.age = "200".into();

    let err = client.save_profile(USER, &raw).await.unwrap_err();
    let validation = match err {
        Error::Validation(v) => v,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(validation.fields().collect::<Vec<_>>(), ["age"]);
    assert!(matches!(
        client.profile(USER).await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn log_food_and_workouts_then_read_dashboard() {
    let client = utc_client();
    client.save_profile(USER, &raw_profile("75")).await.unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 18, 30, 0).unwrap();

    client.add_food(USER, now, &meal("Oats", "300", "10")).await.unwrap();
    client.add_food(USER, now, &meal("Chicken bowl", "450", "45")).await.unwrap();
    client
        .add_workout(
            USER,
            now,
            &RawWorkoutEntry {
                name: "Run".into(),
                duration_min: "35".into(),
                calories_burned: "200".into(),
            },
        )
        .await
        .unwrap();

    let log = client.daily_log(USER, client.today(now)).await.unwrap();
    assert_eq!(log.foods.len(), 2);
    assert_eq!(log.foods[0].name, "Oats");
    assert_eq!(log.foods[1].name, "Chicken bowl");
    assert_eq!(log.foods[0].logged_at.to_string(), "18:30:00");

    let dashboard = client.dashboard(USER, now).await.unwrap();
    assert_eq!(dashboard.total_calories, 750);
    assert_eq!(dashboard.total_calories_burned, 200);
    assert_eq!(dashboard.net_calories, 550);
    assert_eq!(dashboard.remaining_calories, 2138 - 750);
    assert_eq!(dashboard.calorie_status, CalorieStatus::Good);
    assert_eq!(dashboard.workout_status, WorkoutStatus::Good);
    assert_eq!(dashboard.weight_progress, WeightProgress::Percent(0.0));
    assert_eq!(dashboard.days_to_target, None);
}

#[tokio::test]
async fn rejected_food_leaves_log_untouched() {
    let client = utc_client();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();

    let err = client
        .add_food(USER, now, &meal("Feast", "10001", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let log = client.daily_log(USER, client.today(now)).await.unwrap();
    assert!(log.foods.is_empty());
}

#[tokio::test]
async fn delete_entries_by_id() {
    let client = utc_client();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let today = client.today(now);

    let kept = client.add_food(USER, now, &meal("Apple", "95", "")).await.unwrap();
    let gone = client.add_food(USER, now, &meal("Donut", "300", "")).await.unwrap();
    client.delete_food(USER, today, &gone.id).await.unwrap();

    let log = client.daily_log(USER, today).await.unwrap();
    assert_eq!(log.foods, vec![kept]);

    let err = client.delete_food(USER, today, &gone.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    let err = client.delete_workout(USER, today, "missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn entries_land_on_the_configured_date() {
    let config = Config {
        day_boundary: DayBoundary::Fixed(FixedOffset::east_opt(5 * 3600 + 1800).unwrap()),
        ..Config::default()
    };
    let client = ReddyFitClient::new(MemoryStore::new(), &config);
    // 20:00 UTC is already the next day at UTC+05:30
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();

    assert_eq!(client.today(now).to_string(), "2026-10-20");
    client.add_food(USER, now, &meal("Dosa", "250", "")).await.unwrap();
    let log = client.daily_log(USER, client.today(now)).await.unwrap();
    assert_eq!(log.foods[0].logged_at.to_string(), "01:30:00");
}

#[tokio::test]
async fn stats_update_in_place() {
    let client = utc_client();
    client.save_profile(USER, &raw_profile("80")).await.unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let today = client.today(now);

    client
        .update_stats(
            USER,
            today,
            &RawDailyStats {
                steps: Some("8000".into()),
                weight_kg: Some("75".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let log = client
        .update_stats(
            USER,
            today,
            &RawDailyStats {
                water_ml: Some("1500".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((log.steps, log.water_ml, log.weight_kg), (8000, 1500, Some(75.0)));

    let dashboard = client.dashboard(USER, now).await.unwrap();
    assert_eq!(dashboard.weight_progress, WeightProgress::Percent(50.0));
}

#[tokio::test]
async fn firestore_round_trip() {
    let Some((email, password)) = get_credentials() else {
        eprintln!("skipping firestore_round_trip: no credentials");
        return;
    };
    let config = Config::from_env().unwrap();
    if config.firebase.is_none() {
        eprintln!("skipping firestore_round_trip: firebase not configured");
        return;
    }

    let (client, user_id) = ReddyFitClient::login(&config, &email, &password)
        .await
        .unwrap();
    let saved = client
        .save_profile(&user_id, &raw_profile("75"))
        .await
        .unwrap();
    assert_eq!(client.profile(&user_id).await.unwrap(), saved);

    let now = Utc::now();
    let entry = client
        .add_food(&user_id, now, &meal("Integration test", "1", ""))
        .await
        .unwrap();
    let today = client.today(now);
    let log = client.daily_log(&user_id, today).await.unwrap();
    assert!(log.foods.iter().any(|f| f.id == entry.id));

    client.delete_food(&user_id, today, &entry.id).await.unwrap();
    let log = client.daily_log(&user_id, today).await.unwrap();
    assert!(log.foods.iter().all(|f| f.id != entry.id));
}

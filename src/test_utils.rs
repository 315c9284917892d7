//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers

use crate::models::{GoalType, PlanConstraints, WorkoutRecord, WorkoutType};
use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed a half-marathon plan starting 2024-01-01 and return its id
pub async fn seed_test_plan(pool: &SqlitePool) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO plans
      (name, goal_type, start_date, duration_weeks, max_days_per_week,
       long_run_day, weekly_increase_cap, long_run_cap, guardrails_enabled)
    VALUES ('Test Plan', 'half', '2024-01-01', 12, 5, 'Sunday', 0.10, 0.30, 1)
    "#,
  )
  .execute(pool)
  .await
  .expect("Failed to seed plan");

  result.last_insert_rowid()
}

/// Insert a single current-version workout and return its id
pub async fn seed_test_workout(
  pool: &SqlitePool,
  plan_id: i64,
  date: &str,
  workout_type: &str,
  planned_distance: Option<f64>,
) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO workouts (plan_id, date, workout_type, planned_distance)
    VALUES (?1, ?2, ?3, ?4)
    "#,
  )
  .bind(plan_id)
  .bind(date)
  .bind(workout_type)
  .bind(planned_distance)
  .execute(pool)
  .await
  .expect("Failed to insert test workout");

  result.last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Plan constraints matching the seeded test plan
pub fn mock_plan_constraints() -> PlanConstraints {
  PlanConstraints {
    id: 1,
    name: "Test Plan".to_string(),
    goal_type: GoalType::Half,
    start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
    race_date: None,
    duration_weeks: 12,
    max_days_per_week: 5,
    long_run_day: "Sunday".to_string(),
    weekly_increase_cap: 0.10,
    long_run_cap: 0.30,
    guardrails_enabled: true,
  }
}

/// Create a completed workout record for planner history
pub fn mock_workout_record(workout_type: &str, actual_distance: f64) -> WorkoutRecord {
  WorkoutRecord {
    date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("Valid test date"),
    workout_type: workout_type.parse::<WorkoutType>().unwrap_or_default(),
    planned_distance: Some(actual_distance),
    completed: true,
    actual_distance: Some(actual_distance),
    actual_time_seconds: Some(3600),
    actual_rpe: Some(5),
  }
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

/// Seven consecutive ISO dates starting at `start` ('YYYY-MM-DD')
pub fn week_of(start: &str) -> Vec<String> {
  let first = NaiveDate::parse_from_str(start, "%Y-%m-%d").expect("Invalid test date");
  (0..7)
    .map(|i| (first + Duration::days(i)).format("%Y-%m-%d").to_string())
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('plans', 'workouts', 'app_settings', 'ai_usage_log')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_helpers_insert_rows() {
    let pool = setup_test_db().await;

    let plan_id = seed_test_plan(&pool).await;
    seed_test_workout(&pool, plan_id, "2024-01-02", "easy", Some(3.0)).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workouts");
    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_week_of_spans_seven_days() {
    let dates = week_of("2024-01-01");
    assert_eq!(dates.len(), 7);
    assert_eq!(dates[0], "2024-01-01");
    assert_eq!(dates[6], "2024-01-07");

    // Month boundary
    let dates = week_of("2024-01-29");
    assert_eq!(dates[6], "2024-02-04");
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let ctx = mock_plan_constraints();
    assert_eq!(ctx.goal_type, GoalType::Half);
    assert_eq!(ctx.long_run_day, "Sunday");

    let record = mock_workout_record("tempo", 5.0);
    assert_eq!(record.workout_type, WorkoutType::Tempo);
    assert!(record.completed);
    assert_eq!(record.actual_distance, Some(5.0));
  }
}

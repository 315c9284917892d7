//! SQLite persistence for plans, workouts, and app settings
//!
//! This is the boundary the planner's callers use: the planner itself never
//! touches the database. Applying a week of suggestions means deleting the
//! week's current rows and inserting one row per non-rest suggestion.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::fs;
use std::path::Path;

use crate::models::{
  NewPlan, NewWorkout, PlanConstraints, PlanUsage, Workout, WorkoutCompletion, WorkoutRecord,
  WorkoutSuggestion,
};

pub type DbPool = SqlitePool;

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, Box<dyn std::error::Error>> {
  if let Some(parent) = db_path.parent() {
    fs::create_dir_all(parent)?;
  }
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  println!("Initializing database at: {}", db_path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  println!("Database initialized successfully");

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Plan Operations
/// ---------------------------------------------------------------------------

pub async fn create_plan(pool: &DbPool, plan: &NewPlan) -> Result<i64, String> {
  let result = sqlx::query(
    r#"
    INSERT INTO plans
      (name, goal_type, start_date, race_date, duration_weeks,
       max_days_per_week, long_run_day, weekly_increase_cap,
       long_run_cap, guardrails_enabled)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    "#,
  )
  .bind(&plan.name)
  .bind(plan.goal_type.to_string())
  .bind(plan.start_date)
  .bind(plan.race_date)
  .bind(plan.duration_weeks)
  .bind(plan.max_days_per_week)
  .bind(&plan.long_run_day)
  .bind(plan.weekly_increase_cap)
  .bind(plan.long_run_cap)
  .bind(plan.guardrails_enabled)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to create plan: {}", e))?;

  Ok(result.last_insert_rowid())
}

fn plan_from_row(row: &sqlx::sqlite::SqliteRow) -> PlanConstraints {
  let goal: String = row.get("goal_type");
  PlanConstraints {
    id: row.get("id"),
    name: row.get("name"),
    goal_type: goal.parse().unwrap_or_default(),
    start_date: row.get("start_date"),
    race_date: row.get("race_date"),
    duration_weeks: row.get("duration_weeks"),
    max_days_per_week: row.get("max_days_per_week"),
    long_run_day: row.get("long_run_day"),
    weekly_increase_cap: row.get("weekly_increase_cap"),
    long_run_cap: row.get("long_run_cap"),
    guardrails_enabled: row.get("guardrails_enabled"),
  }
}

pub async fn get_plan(pool: &DbPool, plan_id: i64) -> Result<PlanConstraints, String> {
  let row = sqlx::query("SELECT * FROM plans WHERE id = ?")
    .bind(plan_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("Failed to load plan: {}", e))?;

  row
    .map(|r| plan_from_row(&r))
    .ok_or_else(|| format!("Plan not found: {}", plan_id))
}

/// All plans, most recent first
pub async fn list_plans(pool: &DbPool) -> Result<Vec<PlanConstraints>, String> {
  let rows = sqlx::query("SELECT * FROM plans ORDER BY created_at DESC, id DESC")
    .fetch_all(pool)
    .await
    .map_err(|e| format!("Failed to list plans: {}", e))?;

  Ok(rows.iter().map(plan_from_row).collect())
}

/// ---------------------------------------------------------------------------
/// Workout CRUD
/// ---------------------------------------------------------------------------

pub async fn create_workout(pool: &DbPool, workout: &NewWorkout) -> Result<i64, String> {
  let result = sqlx::query(
    r#"
    INSERT INTO workouts
      (plan_id, date, workout_type, planned_distance, planned_intensity,
       description, notes, modified_by)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    "#,
  )
  .bind(workout.plan_id)
  .bind(workout.date)
  .bind(workout.workout_type.to_string())
  .bind(workout.planned_distance)
  .bind(&workout.planned_intensity)
  .bind(&workout.description)
  .bind(&workout.notes)
  .bind(workout.modified_by.as_deref().unwrap_or("initial_gen"))
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to create workout: {}", e))?;

  Ok(result.last_insert_rowid())
}

/// Current-version workouts for a plan, date ascending
pub async fn get_workouts_by_plan(pool: &DbPool, plan_id: i64) -> Result<Vec<Workout>, String> {
  sqlx::query_as::<_, Workout>(
    r#"
    SELECT * FROM workouts
    WHERE plan_id = ? AND is_current_version = 1
    ORDER BY date ASC
    "#,
  )
  .bind(plan_id)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to fetch workouts: {}", e))
}

pub async fn get_workouts_on_date(
  pool: &DbPool,
  plan_id: i64,
  date: &str,
) -> Result<Vec<Workout>, String> {
  sqlx::query_as::<_, Workout>(
    r#"
    SELECT * FROM workouts
    WHERE plan_id = ? AND date = ? AND is_current_version = 1
    ORDER BY id ASC
    "#,
  )
  .bind(plan_id)
  .bind(date)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to fetch workouts: {}", e))
}

/// Workouts within [start_date, end_date] inclusive ('YYYY-MM-DD')
pub async fn get_workouts_in_range(
  pool: &DbPool,
  plan_id: i64,
  start_date: &str,
  end_date: &str,
) -> Result<Vec<Workout>, String> {
  sqlx::query_as::<_, Workout>(
    r#"
    SELECT * FROM workouts
    WHERE plan_id = ? AND date >= ? AND date <= ? AND is_current_version = 1
    ORDER BY date ASC
    "#,
  )
  .bind(plan_id)
  .bind(start_date)
  .bind(end_date)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to fetch workouts: {}", e))
}

pub async fn delete_workout(pool: &DbPool, workout_id: i64) -> Result<(), String> {
  sqlx::query("DELETE FROM workouts WHERE id = ?")
    .bind(workout_id)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to delete workout: {}", e))?;

  Ok(())
}

/// Mark a workout as completed and log actuals
pub async fn update_workout_completion(
  pool: &DbPool,
  workout_id: i64,
  completion: &WorkoutCompletion,
) -> Result<(), String> {
  sqlx::query(
    r#"
    UPDATE workouts
    SET completed           = 1,
        actual_distance     = ?,
        actual_time_seconds = ?,
        actual_rpe          = ?,
        avg_hr              = ?,
        elevation_gain      = ?,
        completion_notes    = ?,
        completed_at        = ?
    WHERE id = ?
    "#,
  )
  .bind(completion.actual_distance)
  .bind(completion.actual_time_seconds)
  .bind(completion.actual_rpe)
  .bind(completion.avg_hr)
  .bind(completion.elevation_gain)
  .bind(&completion.completion_notes)
  .bind(Utc::now().to_rfc3339())
  .bind(workout_id)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to update completion: {}", e))?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Planner Support
/// ---------------------------------------------------------------------------

/// Completed workouts in the `weeks` before `end_date`, as planner history
pub async fn recent_completed_records(
  pool: &DbPool,
  plan_id: i64,
  end_date: NaiveDate,
  weeks: i64,
) -> Result<Vec<WorkoutRecord>, String> {
  let start_date = end_date - Duration::weeks(weeks);
  let workouts = sqlx::query_as::<_, Workout>(
    r#"
    SELECT * FROM workouts
    WHERE plan_id = ? AND completed = 1
      AND date >= ? AND date <= ?
      AND is_current_version = 1
    ORDER BY date ASC
    "#,
  )
  .bind(plan_id)
  .bind(start_date)
  .bind(end_date)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to fetch history: {}", e))?;

  Ok(workouts.iter().map(WorkoutRecord::from).collect())
}

/// Replace a week with the planner's suggestions.
///
/// Deletes the current rows on every input date, then inserts one row per
/// non-rest suggestion. Returns the number of rows inserted.
pub async fn apply_week_suggestions(
  pool: &DbPool,
  plan_id: i64,
  week_dates: &[String],
  suggestions: &[WorkoutSuggestion],
) -> Result<usize, String> {
  for date in week_dates {
    sqlx::query("DELETE FROM workouts WHERE plan_id = ? AND date = ? AND is_current_version = 1")
      .bind(plan_id)
      .bind(date)
      .execute(pool)
      .await
      .map_err(|e| format!("Failed to clear week: {}", e))?;
  }

  let mut inserted = 0;
  for s in suggestions {
    if s.is_rest() {
      continue;
    }
    sqlx::query(
      r#"
      INSERT INTO workouts
        (plan_id, date, workout_type, planned_distance, planned_intensity,
         description, modified_by)
      VALUES (?, ?, ?, ?, ?, ?, 'ai_recalc')
      "#,
    )
    .bind(plan_id)
    .bind(&s.date)
    .bind(s.workout_type.to_string())
    .bind(s.planned_distance)
    .bind(&s.planned_intensity)
    .bind(&s.description)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to insert suggestion: {}", e))?;
    inserted += 1;
  }

  Ok(inserted)
}

/// ---------------------------------------------------------------------------
/// Settings / Usage Log
/// ---------------------------------------------------------------------------

pub async fn get_setting(pool: &DbPool, key: &str) -> Result<Option<String>, String> {
  let row = sqlx::query("SELECT value FROM app_settings WHERE key = ?")
    .bind(key)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("Failed to read setting: {}", e))?;

  Ok(row.map(|r| r.get("value")))
}

pub async fn set_setting(pool: &DbPool, key: &str, value: &str) -> Result<(), String> {
  sqlx::query(
    r#"
    INSERT INTO app_settings (key, value)
    VALUES (?, ?)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value
    "#,
  )
  .bind(key)
  .bind(value)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to write setting: {}", e))?;

  Ok(())
}

/// Record an AI planning call for cost tracking
pub async fn log_ai_usage(
  pool: &DbPool,
  usage: &PlanUsage,
  purpose: Option<&str>,
) -> Result<i64, String> {
  let result = sqlx::query(
    r#"
    INSERT INTO ai_usage_log
      (model, tokens_prompt, tokens_completion, usd_cost, purpose)
    VALUES (?, ?, ?, ?, ?)
    "#,
  )
  .bind(&usage.model)
  .bind(usage.prompt_tokens)
  .bind(usage.completion_tokens)
  .bind(usage.estimated_cost_usd)
  .bind(purpose)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to log usage: {}", e))?;

  Ok(result.last_insert_rowid())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Workout Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
  #[default]
  Easy,
  Tempo,
  Intervals,
  Long,
  Recovery,
  Rest,
  Crosstrain,
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Easy => write!(f, "easy"),
      Self::Tempo => write!(f, "tempo"),
      Self::Intervals => write!(f, "intervals"),
      Self::Long => write!(f, "long"),
      Self::Recovery => write!(f, "recovery"),
      Self::Rest => write!(f, "rest"),
      Self::Crosstrain => write!(f, "crosstrain"),
    }
  }
}

impl std::str::FromStr for WorkoutType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "easy" => Ok(Self::Easy),
      "tempo" => Ok(Self::Tempo),
      "intervals" => Ok(Self::Intervals),
      "long" => Ok(Self::Long),
      "recovery" => Ok(Self::Recovery),
      "rest" => Ok(Self::Rest),
      "crosstrain" => Ok(Self::Crosstrain),
      _ => Err(format!("Unknown workout type: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout Rows
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workout {
  pub id: i64,
  pub plan_id: i64,
  pub date: NaiveDate,
  pub version: i64,
  pub is_current_version: bool,
  pub workout_type: String,
  pub planned_distance: Option<f64>,
  pub planned_intensity: Option<String>,
  pub description: Option<String>,
  pub notes: Option<String>,
  pub modified_by: Option<String>,
  pub completed: bool,
  pub actual_distance: Option<f64>,
  pub actual_time_seconds: Option<i64>,
  pub actual_rpe: Option<i64>,
  pub avg_hr: Option<i64>,
  pub elevation_gain: Option<f64>,
  pub completion_notes: Option<String>,
  pub completed_at: Option<String>,
  pub created_at: Option<String>,
}

/// For inserting new workouts (without id, versioning defaults, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
  pub plan_id: i64,
  pub date: NaiveDate,
  pub workout_type: WorkoutType,
  pub planned_distance: Option<f64>,
  pub planned_intensity: Option<String>,
  pub description: Option<String>,
  pub notes: Option<String>,
  pub modified_by: Option<String>,
}

/// Completion actuals logged against a planned workout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutCompletion {
  pub actual_distance: Option<f64>,
  pub actual_time_seconds: Option<i64>,
  pub actual_rpe: Option<i64>,
  pub avg_hr: Option<i64>,
  pub elevation_gain: Option<f64>,
  pub completion_notes: Option<String>,
}

/// ---------------------------------------------------------------------------
/// History View
/// ---------------------------------------------------------------------------

/// Compact read-only view of past activity handed to the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
  pub date: NaiveDate,
  pub workout_type: WorkoutType,
  pub planned_distance: Option<f64>,
  pub completed: bool,
  pub actual_distance: Option<f64>,
  pub actual_time_seconds: Option<i64>,
  pub actual_rpe: Option<i64>,
}

impl From<&Workout> for WorkoutRecord {
  fn from(w: &Workout) -> Self {
    Self {
      date: w.date,
      workout_type: w.workout_type.parse().unwrap_or_default(),
      planned_distance: w.planned_distance,
      completed: w.completed,
      actual_distance: w.actual_distance,
      actual_time_seconds: w.actual_time_seconds,
      actual_rpe: w.actual_rpe,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_workout_type_roundtrip() {
    for t in ["easy", "tempo", "intervals", "long", "recovery", "rest", "crosstrain"] {
      let parsed: WorkoutType = t.parse().unwrap();
      assert_eq!(parsed.to_string(), t);
    }
  }

  #[test]
  fn test_workout_type_unknown_defaults_to_easy() {
    let parsed: WorkoutType = "fartlek".parse::<WorkoutType>().unwrap_or_default();
    assert_eq!(parsed, WorkoutType::Easy);
  }

  #[test]
  fn test_workout_type_serde_lowercase() {
    let json = serde_json::to_string(&WorkoutType::Intervals).unwrap();
    assert_eq!(json, "\"intervals\"");
  }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Goal Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GoalType {
  #[default]
  #[serde(rename = "general")]
  General,
  #[serde(rename = "5k")]
  FiveK,
  #[serde(rename = "10k")]
  TenK,
  #[serde(rename = "half")]
  Half,
  #[serde(rename = "marathon")]
  Marathon,
}

impl std::fmt::Display for GoalType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::General => write!(f, "general"),
      Self::FiveK => write!(f, "5k"),
      Self::TenK => write!(f, "10k"),
      Self::Half => write!(f, "half"),
      Self::Marathon => write!(f, "marathon"),
    }
  }
}

impl std::str::FromStr for GoalType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "general" => Ok(Self::General),
      "5k" => Ok(Self::FiveK),
      "10k" => Ok(Self::TenK),
      "half" => Ok(Self::Half),
      "marathon" => Ok(Self::Marathon),
      _ => Err(format!("Unknown goal type: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Plan Constraints
/// ---------------------------------------------------------------------------

/// Immutable planning input for one training plan.
///
/// `long_run_day` is stored as a weekday name ("Sunday"); unparseable or
/// missing values fall back to Sunday at planning time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConstraints {
  pub id: i64,
  pub name: String,
  pub goal_type: GoalType,
  pub start_date: Option<NaiveDate>,
  pub race_date: Option<NaiveDate>,
  pub duration_weeks: i64,
  pub max_days_per_week: i64,
  pub long_run_day: String,
  pub weekly_increase_cap: f64,
  pub long_run_cap: f64,
  pub guardrails_enabled: bool,
}

/// For inserting new plans (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
  pub name: String,
  pub goal_type: GoalType,
  pub start_date: Option<NaiveDate>,
  pub race_date: Option<NaiveDate>,
  pub duration_weeks: i64,
  pub max_days_per_week: i64,
  pub long_run_day: String,
  pub weekly_increase_cap: f64,
  pub long_run_cap: f64,
  pub guardrails_enabled: bool,
}

impl Default for NewPlan {
  fn default() -> Self {
    Self {
      name: "Plan".to_string(),
      goal_type: GoalType::General,
      start_date: None,
      race_date: None,
      duration_weeks: 12,
      max_days_per_week: 5,
      long_run_day: "Sunday".to_string(),
      weekly_increase_cap: 0.10,
      long_run_cap: 0.30,
      guardrails_enabled: true,
    }
  }
}

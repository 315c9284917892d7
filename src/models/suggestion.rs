use serde::{Deserialize, Serialize};

use crate::models::workout::WorkoutType;

/// One suggested workout for one calendar date.
///
/// `date` echoes the input date string verbatim so callers can rely on
/// suggestion[i].date == week_dates[i].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSuggestion {
  pub date: String,
  pub workout_type: WorkoutType,
  pub planned_distance: Option<f64>,
  pub planned_intensity: Option<String>,
  pub description: Option<String>,
}

impl WorkoutSuggestion {
  /// A rest day: no distance, no intensity, no description.
  pub fn rest(date: &str) -> Self {
    Self {
      date: date.to_string(),
      workout_type: WorkoutType::Rest,
      planned_distance: None,
      planned_intensity: None,
      description: None,
    }
  }

  pub fn is_rest(&self) -> bool {
    self.workout_type == WorkoutType::Rest
  }
}

/// Token usage and cost accounting for one planning call.
///
/// Purely informational; the heuristic provider reports no tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanUsage {
  pub prompt_tokens: Option<u32>,
  pub completion_tokens: Option<u32>,
  pub total_tokens: Option<u32>,
  pub estimated_cost_usd: Option<f64>,
  pub model: String,
}

impl PlanUsage {
  pub fn heuristic() -> Self {
    Self {
      prompt_tokens: None,
      completion_tokens: None,
      total_tokens: None,
      estimated_cost_usd: None,
      model: "heuristic".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rest_suggestion_has_no_distance() {
    let s = WorkoutSuggestion::rest("2024-01-01");
    assert!(s.is_rest());
    assert_eq!(s.date, "2024-01-01");
    assert!(s.planned_distance.is_none());
    assert!(s.planned_intensity.is_none());
  }

  #[test]
  fn test_heuristic_usage_is_empty() {
    let usage = PlanUsage::heuristic();
    assert_eq!(usage.model, "heuristic");
    assert!(usage.total_tokens.is_none());
    assert!(usage.estimated_cost_usd.is_none());
  }
}

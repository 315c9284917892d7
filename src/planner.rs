//! Weekly Plan Generation
//!
//! Turns plan constraints plus a list of calendar dates into one workout
//! suggestion per date. Two providers exist:
//! - a deterministic goal-table heuristic (always available)
//! - the OpenAI client in `llm` (optional, best-effort)
//!
//! Key principles:
//! - Output is always 1:1 with the input dates, in input order
//! - The long-run day is claimed first, before the day-count cap fills up
//! - Guardrail caps bound week-over-week progression
//! - Remote failures are absorbed; the week is never left unplanned

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

use crate::llm::OpenAiClient;
use crate::models::{PlanConstraints, PlanUsage, WorkoutRecord, WorkoutSuggestion, WorkoutType};
use crate::settings::PlannerSettings;

/// Dampening applied to the weekly increase cap for long-run progression.
const LONG_RUN_DAMPING: f64 = 0.7;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum PlanError {
  #[error("Invalid date '{0}': {1}")]
  InvalidDate(String, #[source] chrono::ParseError),
}

/// ---------------------------------------------------------------------------
/// Goal Mileage Table
/// ---------------------------------------------------------------------------

/// Per-goal baseline mileages before progression scaling.
struct GoalMileage {
  easy: f64,
  tempo: f64,
  intervals: f64,
  long: f64,
}

fn base_mileage(goal: crate::models::GoalType) -> GoalMileage {
  use crate::models::GoalType::*;
  match goal {
    FiveK => GoalMileage { easy: 2.5, tempo: 3.5, intervals: 3.0, long: 5.0 },
    TenK => GoalMileage { easy: 3.5, tempo: 4.5, intervals: 4.0, long: 7.0 },
    Half => GoalMileage { easy: 4.0, tempo: 5.0, intervals: 4.5, long: 10.0 },
    Marathon => GoalMileage { easy: 5.0, tempo: 6.0, intervals: 5.0, long: 14.0 },
    General => GoalMileage { easy: 3.0, tempo: 4.0, intervals: 3.5, long: 6.0 },
  }
}

/// ---------------------------------------------------------------------------
/// Progression
/// ---------------------------------------------------------------------------

/// Whole weeks elapsed between the plan start and the week being planned.
fn weeks_into_plan(start_date: Option<NaiveDate>, week_start: NaiveDate) -> i64 {
  match start_date {
    Some(start) => ((week_start - start).num_days() / 7).max(0),
    None => 0,
  }
}

/// Multiplier applied to base mileage for the given week.
/// With guardrails enabled the factor never exceeds 1 + long_run_cap.
fn progress_factor(ctx: &PlanConstraints, weeks: i64, increase_cap: f64) -> f64 {
  let factor = 1.0 + weeks as f64 * increase_cap;
  if ctx.guardrails_enabled {
    factor.min(1.0 + ctx.long_run_cap)
  } else {
    factor
  }
}

fn round1(x: f64) -> f64 {
  (x * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Day Selection
/// ---------------------------------------------------------------------------

fn weekday_at(index: u32) -> Weekday {
  match index % 7 {
    0 => Weekday::Mon,
    1 => Weekday::Tue,
    2 => Weekday::Wed,
    3 => Weekday::Thu,
    4 => Weekday::Fri,
    5 => Weekday::Sat,
    _ => Weekday::Sun,
  }
}

/// Pick which weekdays train. The long-run day is claimed first so the
/// day-count cap can never squeeze it out; the rest fill from a fixed
/// preference order.
fn select_training_days(long_day: Weekday, max_days: i64) -> Vec<Weekday> {
  let mut chosen = Vec::new();
  if max_days < 1 {
    return chosen;
  }
  chosen.push(long_day);

  let pattern: [Weekday; 7] = if long_day == Weekday::Sun {
    [
      Weekday::Tue,
      Weekday::Thu,
      Weekday::Sat,
      Weekday::Wed,
      Weekday::Mon,
      Weekday::Fri,
      Weekday::Sun,
    ]
  } else {
    [
      Weekday::Tue,
      Weekday::Thu,
      Weekday::Sun,
      Weekday::Sat,
      Weekday::Wed,
      Weekday::Mon,
      Weekday::Fri,
    ]
  };

  for day in pattern {
    if chosen.len() as i64 >= max_days {
      break;
    }
    if day != long_day {
      chosen.push(day);
    }
  }
  chosen
}

/// Role for a chosen training day: tempo sits 3 days before the long run,
/// intervals 5 days before; everything else chosen is an easy day.
fn role_for(day: Weekday, long_day: Weekday) -> WorkoutType {
  if day == long_day {
    return WorkoutType::Long;
  }
  let long_idx = long_day.num_days_from_monday();
  let tempo_day = weekday_at(long_idx + 4); // long - 3 (mod 7)
  let intervals_day = weekday_at(long_idx + 2); // long - 5 (mod 7)
  if day == tempo_day {
    WorkoutType::Tempo
  } else if day == intervals_day {
    WorkoutType::Intervals
  } else {
    WorkoutType::Easy
  }
}

/// ---------------------------------------------------------------------------
/// Heuristic Provider
/// ---------------------------------------------------------------------------

/// Deterministic weekly planner.
///
/// Mileage is goal-table driven: the per-goal baselines above, scaled by the
/// progression factor for the week being planned. Long runs progress on a
/// dampened cap so they grow slower than the rest of the week.
///
/// Dates that share a weekday share that weekday's role, so inputs longer
/// than seven days are handled without special casing.
pub fn heuristic_week(
  ctx: &PlanConstraints,
  week_dates: &[String],
) -> Result<Vec<WorkoutSuggestion>, PlanError> {
  if week_dates.is_empty() {
    return Ok(Vec::new());
  }

  let parsed: Vec<NaiveDate> = week_dates
    .iter()
    .map(|d| {
      NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| PlanError::InvalidDate(d.clone(), e))
    })
    .collect::<Result<_, _>>()?;

  let long_day: Weekday = ctx.long_run_day.parse().unwrap_or(Weekday::Sun);
  let weeks = weeks_into_plan(ctx.start_date, parsed[0]);
  let factor = progress_factor(ctx, weeks, ctx.weekly_increase_cap);
  let long_factor = progress_factor(ctx, weeks, ctx.weekly_increase_cap * LONG_RUN_DAMPING);
  let base = base_mileage(ctx.goal_type);
  let chosen = select_training_days(long_day, ctx.max_days_per_week);

  let suggestions = week_dates
    .iter()
    .zip(&parsed)
    .map(|(raw, date)| {
      let day = date.weekday();
      if !chosen.contains(&day) {
        return WorkoutSuggestion::rest(raw);
      }
      match role_for(day, long_day) {
        WorkoutType::Long => WorkoutSuggestion {
          date: raw.clone(),
          workout_type: WorkoutType::Long,
          planned_distance: Some(round1(base.long * long_factor)),
          planned_intensity: Some("Z2-3".to_string()),
          description: Some("Comfortable long run; keep it conversational.".to_string()),
        },
        WorkoutType::Tempo => WorkoutSuggestion {
          date: raw.clone(),
          workout_type: WorkoutType::Tempo,
          planned_distance: Some(round1(base.tempo * factor)),
          planned_intensity: Some("20-25min comfortably hard".to_string()),
          description: Some("Steady tempo; smooth effort.".to_string()),
        },
        WorkoutType::Intervals => WorkoutSuggestion {
          date: raw.clone(),
          workout_type: WorkoutType::Intervals,
          planned_distance: Some(round1(base.intervals * factor)),
          planned_intensity: Some("5x(3min hard / 2min easy)".to_string()),
          description: Some("Quality intervals; warmup/cooldown included.".to_string()),
        },
        _ => WorkoutSuggestion {
          date: raw.clone(),
          workout_type: WorkoutType::Easy,
          planned_distance: Some(round1(base.easy * factor)),
          planned_intensity: Some("Z1-2".to_string()),
          description: Some("Easy shakeout; relaxed form.".to_string()),
        },
      }
    })
    .collect();

  Ok(suggestions)
}

/// ---------------------------------------------------------------------------
/// Week Planner Facade
/// ---------------------------------------------------------------------------

/// Facade the calendar layer uses. When the remote provider is configured we
/// try it first; on any failure we fall back to the heuristic.
pub struct WeekPlanner {
  remote: Option<OpenAiClient>,
}

impl WeekPlanner {
  /// Build from resolved settings. The remote client only exists when the
  /// flag is on AND a credential resolved.
  pub fn new(settings: &PlannerSettings) -> Self {
    let remote = if settings.use_remote {
      settings
        .api_key
        .as_ref()
        .map(|key| OpenAiClient::new(key.clone(), settings.model.clone()))
    } else {
      None
    };
    Self { remote }
  }

  pub fn heuristic_only() -> Self {
    Self { remote: None }
  }

  /// A planner that always tries the given remote client first.
  pub fn with_remote(client: OpenAiClient) -> Self {
    Self { remote: Some(client) }
  }

  pub fn uses_remote(&self) -> bool {
    self.remote.is_some()
  }

  /// Plan one week: one suggestion per input date, in input order.
  ///
  /// Recent history only informs the remote provider's prompt; heuristic
  /// mileage comes from the goal table alone. The only surfaced failure is a
  /// malformed input date.
  pub async fn plan_week(
    &self,
    ctx: &PlanConstraints,
    week_dates: &[String],
    recent: &[WorkoutRecord],
  ) -> Result<(Vec<WorkoutSuggestion>, PlanUsage), PlanError> {
    if let Some(client) = &self.remote {
      if let Ok(result) = client.plan_week(ctx, week_dates, recent).await {
        return Ok(result);
      }
      // Fall through: any remote failure lands on the heuristic
    }
    let suggestions = heuristic_week(ctx, week_dates)?;
    Ok((suggestions, PlanUsage::heuristic()))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

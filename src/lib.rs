//! RunCoach planning core
//!
//! A library for managing running training plans: SQLite-backed plans and
//! workouts, a deterministic weekly planner, and an optional OpenAI-backed
//! suggestion provider that falls back to the heuristic when unavailable.
//!
//! Typical flow:
//! 1. `store::initialize_db` opens the database and runs migrations
//! 2. `settings::PlannerSettings::load` resolves remote-planning settings
//! 3. `planner::WeekPlanner::plan_week` produces one suggestion per date
//! 4. `store::apply_week_suggestions` replaces the week's workout rows

pub mod llm;
pub mod models;
pub mod planner;
pub mod settings;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use models::{
  GoalType, NewPlan, NewWorkout, PlanConstraints, PlanUsage, Workout, WorkoutCompletion,
  WorkoutRecord, WorkoutSuggestion, WorkoutType,
};
pub use planner::{heuristic_week, PlanError, WeekPlanner};
pub use settings::PlannerSettings;

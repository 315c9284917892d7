pub mod plan;
pub mod suggestion;
pub mod workout;

pub use plan::{GoalType, NewPlan, PlanConstraints};
pub use suggestion::{PlanUsage, WorkoutSuggestion};
pub use workout::{NewWorkout, Workout, WorkoutCompletion, WorkoutRecord, WorkoutType};

//! Data models
//!
//! Profile, plan, progress, and query types, plus the tables that persist them.

mod burn;
mod diet;
mod profile;
mod progress;
mod workout;

pub use burn::{CalorieBurnQuery, Intensity, WorkoutType};
pub use diet::{
    DietDay, DietPlan, DietPlanEntry, DietTarget, DietTotals, MacroSplit, MealItem, MealType,
    PlanSource,
};
pub use profile::{
    ActivityLevel, DietPreference, Gender, Goal, InvalidProfileError, UserProfile,
    UserProfileCreate, WorkoutTime, MAX_AGE,
};
pub use progress::{DailyLog, DailyLogUpdate};
pub use workout::{
    CustomWorkoutRequest, FitnessLevel, Reps, WorkoutDay, WorkoutExercise, WorkoutPlan,
    WorkoutPlanEntry,
};

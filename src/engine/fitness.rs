//! Fitness level resolution
//!
//! Maps a profile's activity level to a workout difficulty tier.

use crate::models::{ActivityLevel, FitnessLevel};

pub fn resolve(activity_level: ActivityLevel) -> FitnessLevel {
    match activity_level {
        ActivityLevel::Sedentary | ActivityLevel::Light => FitnessLevel::Beginner,
        ActivityLevel::Moderate => FitnessLevel::Intermediate,
        ActivityLevel::Intense => FitnessLevel::Advanced,
    }
}

/// Lenient entry point for free-form input. Unrecognized levels are beginner.
pub fn resolve_str(activity_level: &str) -> FitnessLevel {
    ActivityLevel::from_str(activity_level)
        .map(resolve)
        .unwrap_or(FitnessLevel::Beginner)
}
